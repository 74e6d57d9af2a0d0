pub mod notify;
pub mod sns;
