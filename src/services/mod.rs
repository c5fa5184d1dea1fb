pub mod backend;
pub mod image_store;
pub mod mock_store;
pub mod remote_proxy;
pub mod user_service;

pub use backend::*;
pub use image_store::*;
pub use mock_store::*;
pub use remote_proxy::*;
pub use user_service::*;
