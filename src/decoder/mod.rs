pub mod frame;
pub mod source;
pub mod video;

pub use frame::Frame;
pub use source::{FrameSource, SourceEvent};
pub use video::VideoDecoder;
