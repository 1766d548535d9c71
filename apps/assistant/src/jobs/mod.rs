pub mod applied;
pub mod feed;
pub mod handlers;
pub mod liked;
