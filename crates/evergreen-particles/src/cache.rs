//! Formation cache
//!
//! Generated records are immutable and shared with the animators through
//! `Arc`. Entries are keyed by category, count and device class, and the
//! whole cache is dropped only when the device class changes.

use crate::config::ParticleCounts;
use crate::formation::{self, FormationParams};
use crate::rand::ParticleRng;
use crate::record::{Category, ParticleRecord};
use crate::text::{BlockFont, GlyphMask, TextPointAllocator, TextSampler};
use evergreen_core::DeviceClass;
use std::collections::HashMap;
use std::sync::Arc;

/// Categories that share the text pool, in allocation order
const TEXT_CATEGORIES: [Category; 3] = [Category::Foliage, Category::Ornament, Category::Light];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormationKey {
    pub category: Category,
    pub count: usize,
    pub device: DeviceClass,
}

/// Records for every particle category of one device class
#[derive(Debug, Clone)]
pub struct FormationSet {
    pub device: DeviceClass,
    pub foliage: Arc<[ParticleRecord]>,
    pub ornaments: Arc<[ParticleRecord]>,
    pub lights: Arc<[ParticleRecord]>,
    pub gifts: Arc<[ParticleRecord]>,
    pub star: ParticleRecord,
}

impl FormationSet {
    pub fn get(&self, category: Category) -> Option<&Arc<[ParticleRecord]>> {
        match category {
            Category::Foliage => Some(&self.foliage),
            Category::Ornament => Some(&self.ornaments),
            Category::Light => Some(&self.lights),
            Category::Gift => Some(&self.gifts),
            Category::Star | Category::Ribbon => None,
        }
    }

    /// Total instanced particles, star excluded
    pub fn total(&self) -> usize {
        self.foliage.len() + self.ornaments.len() + self.lights.len() + self.gifts.len()
    }
}

fn count_for(counts: &ParticleCounts, category: Category) -> usize {
    match category {
        Category::Foliage => counts.foliage,
        Category::Ornament => counts.ornaments,
        Category::Light => counts.lights,
        Category::Gift => counts.gifts,
        Category::Star => 1,
        Category::Ribbon => 0,
    }
}

pub struct FormationCache<M: GlyphMask = BlockFont> {
    seed: u32,
    sampler: TextSampler<M>,
    entries: HashMap<FormationKey, Arc<[ParticleRecord]>>,
    /// Device class the entries were built for
    device: Option<DeviceClass>,
    builds: usize,
}

impl FormationCache<BlockFont> {
    pub fn new(seed: u32) -> Self {
        Self::with_mask(BlockFont, seed)
    }
}

impl<M: GlyphMask> FormationCache<M> {
    pub fn with_mask(mask: M, seed: u32) -> Self {
        Self {
            seed,
            sampler: TextSampler::with_mask(mask, seed),
            entries: HashMap::new(),
            device: None,
            builds: 0,
        }
    }

    /// Records for every category, generating whatever is not cached.
    ///
    /// The text-forming categories are always generated together, in a fixed
    /// order with one allocator, so no two particles share a text point
    /// until the pool wraps.
    pub fn formations(&mut self, counts: &ParticleCounts, device: DeviceClass) -> FormationSet {
        if self.device != Some(device) {
            if let Some(previous) = self.device {
                log::debug!(
                    "[formation] Device class {previous:?} -> {device:?}, dropping {} cached formations",
                    self.entries.len()
                );
            }
            self.entries.clear();
            self.device = Some(device);
        }

        let text_keys = TEXT_CATEGORIES.map(|category| FormationKey {
            category,
            count: count_for(counts, category),
            device,
        });
        if text_keys.iter().all(|k| self.entries.contains_key(k)) {
            log::debug!("[formation] Text formations for {device:?} served from cache");
        } else {
            self.build_text_categories(&text_keys, device);
        }

        let gift_key = FormationKey {
            category: Category::Gift,
            count: counts.gifts,
            device,
        };
        if !self.entries.contains_key(&gift_key) {
            let mut rng = self.rng_for(Category::Gift, device);
            let records = formation::generate_gifts(
                gift_key.count,
                &formation::default_palette(Category::Gift),
                &FormationParams::for_category(Category::Gift),
                &mut rng,
            );
            self.entries.insert(gift_key, records.into());
            self.builds += 1;
        }

        let lookup = |entries: &HashMap<FormationKey, Arc<[ParticleRecord]>>, key: &FormationKey| {
            entries
                .get(key)
                .cloned()
                .unwrap_or_else(|| Arc::from(Vec::<ParticleRecord>::new()))
        };
        let set = FormationSet {
            device,
            foliage: lookup(&self.entries, &text_keys[0]),
            ornaments: lookup(&self.entries, &text_keys[1]),
            lights: lookup(&self.entries, &text_keys[2]),
            gifts: lookup(&self.entries, &gift_key),
            star: formation::star_record(),
        };
        log::info!(
            "[formation] Formations ready for {device:?}: {} particles",
            set.total()
        );
        set
    }

    fn build_text_categories(&mut self, keys: &[FormationKey; 3], device: DeviceClass) {
        let total: usize = keys.iter().map(|k| k.count).sum();
        let pool = self.sampler.sample(total, device);
        if pool.len() < total {
            log::warn!(
                "[formation] Text pool has {} points for {} particles, targets will repeat",
                pool.len(),
                total
            );
        }

        let mut allocator = TextPointAllocator::new(pool);
        for key in keys {
            let mut rng = self.rng_for(key.category, device);
            let records = formation::generate(
                key.category,
                key.count,
                &formation::default_palette(key.category),
                &FormationParams::for_category(key.category),
                &mut rng,
                &mut allocator,
            );
            self.entries.insert(*key, records.into());
            self.builds += 1;
        }
        log::debug!(
            "[formation] Assigned {} text points for {device:?}",
            allocator.assigned()
        );
    }

    /// Independent stream per category and device so rebuilding one
    /// category never shifts another's layout
    fn rng_for(&self, category: Category, device: DeviceClass) -> ParticleRng {
        let category_salt = match category {
            Category::Foliage => 0x1000_0193,
            Category::Ornament => 0x2000_0193,
            Category::Light => 0x3000_0193,
            Category::Gift => 0x4000_0193,
            Category::Star => 0x5000_0193,
            Category::Ribbon => 0x6000_0193,
        };
        let device_salt = device.pick(0x0000_A001, 0x0000_B002);
        ParticleRng::new(self.seed ^ category_salt ^ device_salt)
    }

    /// Drop every cached formation and text sample
    pub fn invalidate(&mut self) {
        self.entries.clear();
        self.sampler.clear();
        self.device = None;
    }

    pub fn device(&self) -> Option<DeviceClass> {
        self.device
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of category generations run so far
    pub fn builds(&self) -> usize {
        self.builds
    }

    pub fn sampler(&self) -> &TextSampler<M> {
        &self.sampler
    }
}
