pub mod flash;
pub mod session;

pub use flash::{redirect_with_flash, FlashMessage, IncomingFlash};
pub use session::{SessionMiddleware, SessionSettings, VisitorSession};
