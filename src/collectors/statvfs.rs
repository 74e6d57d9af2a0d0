use super::Sampler;
use crate::error::SamplingError;
use crate::models::usage::df_percent;
use nix::sys::statvfs::statvfs;
use std::path::Path;

/// Reads usage straight from statvfs(2), without spawning df.
pub struct StatvfsSampler;

impl Sampler for StatvfsSampler {
    fn sample(&self, path: &Path) -> Result<u8, SamplingError> {
        let stat = statvfs(path)
            .map_err(|source| SamplingError::Statvfs { path: path.to_path_buf(), source })?;

        let frsize      = stat.fragment_size() as u64;
        let total_bytes = stat.blocks()           * frsize;
        let free_bytes  = stat.blocks_free()      * frsize;
        let avail_bytes = stat.blocks_available() * frsize;
        let used_bytes  = total_bytes.saturating_sub(free_bytes);

        Ok(df_percent(used_bytes, avail_bytes))
    }
}
