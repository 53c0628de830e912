//! Profile identity cache
//!
//! Embedded profiles are keyed by a 128-bit BLAKE2b digest of their bytes.
//! The cache holds only [`Weak`] references: a profile lives as long as some
//! caller holds it, and a later request for the same bytes after it was
//! dropped simply parses again. The map has no size bound, so an entry only
//! leaves through [`ProfileCache::purge_expired`].

use std::sync::{Arc, LazyLock, Weak};

use blake2::digest::consts::U16;
use blake2::{Blake2b, Digest};
use moka::ops::compute::{CompResult, Op};
use moka::sync::Cache;
use tracing::{debug, trace};

use crate::icc;
use crate::profile::ColorProfile;

type Blake2b128 = Blake2b<U16>;

/// Digest of a profile's bytes
pub type ProfileKey = [u8; 16];

/// Initial size hint for the map
pub const DEFAULT_CAPACITY: usize = 64;

static GLOBAL: LazyLock<ProfileCache> = LazyLock::new(ProfileCache::default);

pub fn profile_key(bytes: &[u8]) -> ProfileKey {
    Blake2b128::digest(bytes).into()
}

/// Content-addressed map of weakly held profiles
pub struct ProfileCache {
    map: Cache<ProfileKey, Weak<ColorProfile>>,
}

impl Default for ProfileCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl ProfileCache {
    /// `capacity` only presizes the map; live entries are never evicted
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: Cache::builder()
                .name("oxscale-profiles")
                .initial_capacity(capacity)
                .build(),
        }
    }

    /// The process-wide cache
    pub fn global() -> &'static ProfileCache {
        &GLOBAL
    }

    /// Return the live profile for `bytes`, parsing on a miss
    ///
    /// An entry whose profile has been dropped is replaced atomically for
    /// its key, so concurrent callers with the same bytes share one parse.
    pub fn get_or_add(&self, bytes: &[u8]) -> Arc<ColorProfile> {
        let key = profile_key(bytes);

        loop {
            let mut created = None;
            let entry = self.map.entry(key).or_insert_with_if(
                || {
                    let profile = icc::parse(bytes);
                    let weak = Arc::downgrade(&profile);
                    created = Some(profile);
                    weak
                },
                |weak| weak.strong_count() == 0,
            );

            if let Some(profile) = created {
                debug!(
                    len = bytes.len(),
                    replaced = entry.is_old_value_replaced(),
                    valid = profile.is_valid(),
                    "profile cache miss"
                );
                return profile;
            }

            if let Some(profile) = entry.into_value().upgrade() {
                trace!(len = bytes.len(), "profile cache hit");
                return profile;
            }

            // dropped between the liveness check and the upgrade, so the
            // next pass replaces it through the same atomic entry
            trace!(len = bytes.len(), "profile cache raced with drop");
        }
    }

    /// Live profile for `bytes`, without parsing
    pub fn get(&self, bytes: &[u8]) -> Option<Arc<ColorProfile>> {
        self.map.get(&profile_key(bytes))?.upgrade()
    }

    /// Remove entries whose profile has been dropped
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&self) -> usize {
        let keys: Vec<ProfileKey> = self
            .map
            .iter()
            .filter(|(_, weak)| weak.strong_count() == 0)
            .map(|(key, _)| *key)
            .collect();

        let mut purged = 0;
        for key in keys {
            let result = self.map.entry(key).and_compute_with(|entry| match entry {
                Some(e) if e.value().strong_count() == 0 => Op::Remove,
                _ => Op::Nop,
            });
            if matches!(result, CompResult::Removed(_)) {
                purged += 1;
            }
        }

        self.map.run_pending_tasks();
        debug!(purged, remaining = self.map.entry_count(), "purged profile cache");
        purged
    }

    /// Entry count, including expired entries not yet purged
    pub fn entry_count(&self) -> u64 {
        self.map.run_pending_tasks();
        self.map.entry_count()
    }
}

/// [`ProfileCache::get_or_add`] on the global cache
pub fn get_or_add(bytes: &[u8]) -> Arc<ColorProfile> {
    ProfileCache::global().get_or_add(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icc::builtin;

    #[test]
    fn test_profile_key() {
        let a = profile_key(builtin::srgb_v4());
        assert_eq!(a, profile_key(builtin::srgb_v4()));
        assert_ne!(a, profile_key(builtin::srgb_compact()));
    }

    #[test]
    fn test_get_or_add_returns_same_instance() {
        let cache = ProfileCache::with_capacity(16);
        let a = cache.get_or_add(builtin::display_p3_v4());
        let b = cache.get_or_add(builtin::display_p3_v4());
        assert!(Arc::ptr_eq(&a, &b));
        assert!(cache.get(builtin::display_p3_v4()).is_some());
    }

    #[test]
    fn test_single_byte_difference() {
        let cache = ProfileCache::with_capacity(16);
        let mut bytes = builtin::srgb_v4().to_vec();
        let a = cache.get_or_add(&bytes);
        bytes[100] ^= 1;
        let b = cache.get_or_add(&bytes);
        assert!(!Arc::ptr_eq(&a, &b));
        assert!(b.is_valid());
    }

    #[test]
    fn test_dropped_profile_is_reparsed() {
        let cache = ProfileCache::with_capacity(16);
        let a = cache.get_or_add(builtin::adobe_rgb_v4());
        let weak = Arc::downgrade(&a);
        drop(a);
        assert!(weak.upgrade().is_none());
        assert!(cache.get(builtin::adobe_rgb_v4()).is_none());

        let b = cache.get_or_add(builtin::adobe_rgb_v4());
        assert!(b.is_valid());
        assert_eq!(cache.purge_expired(), 0);
    }

    #[test]
    fn test_purge_expired() {
        let cache = ProfileCache::with_capacity(16);
        let kept = cache.get_or_add(builtin::srgb_v4());
        drop(cache.get_or_add(builtin::sgrey_v4()));

        assert_eq!(cache.entry_count(), 2);
        assert_eq!(cache.purge_expired(), 1);
        assert_eq!(cache.entry_count(), 1);
        assert!(Arc::ptr_eq(&kept, &cache.get_or_add(builtin::srgb_v4())));
    }

    #[test]
    fn test_live_profiles_outnumber_capacity() {
        let cache = ProfileCache::with_capacity(2);
        let sources = [
            builtin::srgb_v4(),
            builtin::display_p3_v4(),
            builtin::adobe_rgb_v4(),
            builtin::sgrey_v4(),
            builtin::srgb_compact(),
            builtin::adobe_rgb_compact(),
        ];
        let held: Vec<_> = sources.iter().map(|b| cache.get_or_add(b)).collect();

        for (bytes, first) in sources.iter().zip(&held) {
            assert!(Arc::ptr_eq(first, &cache.get_or_add(bytes)));
        }
        assert_eq!(cache.entry_count(), sources.len() as u64);
        assert_eq!(cache.purge_expired(), 0);
    }

    #[test]
    fn test_invalid_bytes_share_sentinel() {
        let cache = ProfileCache::with_capacity(16);
        let p = cache.get_or_add(b"not a profile");
        assert!(Arc::ptr_eq(&p, ColorProfile::invalid()));
    }
}
