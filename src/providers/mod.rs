pub mod dify;
pub mod dify_translate;
