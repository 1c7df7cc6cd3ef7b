mod alert;
mod button;
mod form;
mod layout;

pub use self::alert::*;
pub use self::button::*;
pub use self::form::*;
pub use self::layout::*;
