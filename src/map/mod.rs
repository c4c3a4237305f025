mod format;
mod generator;

pub use format::{
    Corruption, DEFAULT_MAP_PATH, MapError, RunEncoder, decode, encode, encode_codes, load, save,
};
pub use generator::{GeneratorConfig, MapGenerator};
