pub(crate) mod archive;
pub(crate) mod meta;
pub(crate) mod scheduled;
pub(crate) mod shared;
