//! Shared domain value types and naming helpers.

pub mod name;

pub use name::{
    decode_folder_name, display_extension, encode_display_name, is_valid_room_name, version_stem,
};
