pub mod broadcast_feed;
