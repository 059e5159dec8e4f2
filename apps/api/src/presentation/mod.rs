pub mod html;
pub mod http;
