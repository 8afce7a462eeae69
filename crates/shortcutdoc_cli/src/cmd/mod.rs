/// Batch decode command.
pub mod decode;
/// Container layout command.
pub mod info;
/// Value tree printing helpers.
pub mod print;
/// Value tree display command.
pub mod show;
pub(crate) mod util;
