//! Parallel batch encoding and decoding
//!
//! Each call owns its accumulator and cursor, so independent geometries
//! are processed on the rayon pool without any synchronization.

use rayon::prelude::*;

use super::decode::{decode_from_base64, decode_from_bytes};
use super::encode::{encode, EncodedTwkb};
use super::params::EncodingParameters;
use crate::error::Result;
use crate::geometry::Geometry;

pub fn encode_batch(geometries: &[Geometry], params: &EncodingParameters) -> Vec<Result<EncodedTwkb>> {
    geometries.par_iter().map(|g| encode(g, params)).collect()
}

pub fn decode_batch<B>(buffers: &[B]) -> Vec<Result<Geometry>>
where
    B: AsRef<[u8]> + Sync,
{
    buffers.par_iter().map(|b| decode_from_bytes(b.as_ref())).collect()
}

pub fn decode_batch_base64<S>(texts: &[S]) -> Vec<Result<Geometry>>
where
    S: AsRef<str> + Sync,
{
    texts.par_iter().map(|t| decode_from_base64(t.as_ref())).collect()
}
