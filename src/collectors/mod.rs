pub mod df;
pub mod statvfs;

use crate::config::SamplerKind;
use crate::error::SamplingError;
use std::path::Path;

/// Reports used-space percentage (0-100) for the filesystem holding a path.
pub trait Sampler {
    fn sample(&self, path: &Path) -> Result<u8, SamplingError>;
}

pub fn for_kind(kind: SamplerKind) -> Box<dyn Sampler> {
    match kind {
        SamplerKind::Df      => Box::new(df::DfSampler::default()),
        SamplerKind::Statvfs => Box::new(statvfs::StatvfsSampler),
    }
}
