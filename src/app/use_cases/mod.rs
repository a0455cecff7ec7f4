//! Use-Cases: fachliche Editor-Operationen auf dem `EditorState`.

pub mod blocks;
pub mod connect;
pub mod segment_drag;
pub mod selection;
