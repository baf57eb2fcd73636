pub mod page_session;
pub mod session;
