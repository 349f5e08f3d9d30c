mod collection;
mod record;

pub use {
    collection::PhotoCollection,
    record::{PNG_DATA_URI_PREFIX, PhotoId, PhotoRecord, decode_png_data_uri, encode_png_data_uri},
};
