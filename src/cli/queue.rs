use crate::{
    config::{Credentials, Endpoints},
    queue,
};

pub async fn next(credentials: &Credentials, endpoints: &Endpoints) {
    let client = super::session(credentials, endpoints).await;
    println!("Next in Queue: {}", queue::get_next_in_queue(&client).await);
}
