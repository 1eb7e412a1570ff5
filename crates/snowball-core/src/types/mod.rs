//! 워크스페이스 전반에서 사용되는 공통 타입.

mod category;
mod series;
mod window;

pub use category::*;
pub use series::*;
pub use window::*;
