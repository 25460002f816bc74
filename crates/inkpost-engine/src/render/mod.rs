//! Markup production: paragraph assembly over block segments, and the tag
//! scanner used to walk the finished fragment.

pub mod assemble;
pub mod html;

pub use assemble::assemble;
