#![forbid(unsafe_code)]

pub mod background;
pub mod captcha;
pub mod check;
pub mod cli;
pub mod document;
pub mod form;
pub mod logging;
pub mod menu;
pub mod navigation;
pub mod scrollwatch;
pub mod submit;
pub mod transport;
pub mod validate;
pub mod viewport;
