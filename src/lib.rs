pub mod lang {
    pub use vtx_lang::*;
}

pub mod log {
    pub use vtx_log::*;
}
