//! Engine configuration
//!
//! Resource limits are applied through `MagickSetResourceLimit` when the
//! engine starts. Limits left as `None` keep the library defaults (which the
//! library itself derives from `MAGICK_*_LIMIT` variables and policy files).

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Native resource kinds that can be limited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    /// Maximum pixel area of a single image held in memory
    Area,
    /// Bytes of disk for the pixel cache
    Disk,
    /// Open pixel cache files
    File,
    /// Bytes of memory-mapped pixel cache
    Map,
    /// Bytes of heap for the pixel cache
    Memory,
    /// Worker threads for parallel operations
    Thread,
    /// Seconds a single operation may run
    Time,
    /// Microseconds to yield the CPU between operations
    Throttle,
    /// Maximum image width
    Width,
    /// Maximum image height
    Height,
    /// Maximum images in a sequence
    ListLength,
}

impl Resource {
    pub const ALL: [Resource; 11] = [
        Resource::Area,
        Resource::Disk,
        Resource::File,
        Resource::Map,
        Resource::Memory,
        Resource::Thread,
        Resource::Time,
        Resource::Throttle,
        Resource::Width,
        Resource::Height,
        Resource::ListLength,
    ];

    pub(crate) fn to_ffi(self) -> imagick_sys::ResourceType {
        use imagick_sys::ResourceType as R;
        match self {
            Resource::Area => R::AreaResource,
            Resource::Disk => R::DiskResource,
            Resource::File => R::FileResource,
            Resource::Map => R::MapResource,
            Resource::Memory => R::MemoryResource,
            Resource::Thread => R::ThreadResource,
            Resource::Time => R::TimeResource,
            Resource::Throttle => R::ThrottleResource,
            Resource::Width => R::WidthResource,
            Resource::Height => R::HeightResource,
            Resource::ListLength => R::ListLengthResource,
        }
    }

    /// Environment variable read by [`Config::from_env`]
    pub fn env_var(self) -> &'static str {
        match self {
            Resource::Area => "IMAGICK_AREA_LIMIT",
            Resource::Disk => "IMAGICK_DISK_LIMIT",
            Resource::File => "IMAGICK_FILE_LIMIT",
            Resource::Map => "IMAGICK_MAP_LIMIT",
            Resource::Memory => "IMAGICK_MEMORY_LIMIT",
            Resource::Thread => "IMAGICK_THREAD_LIMIT",
            Resource::Time => "IMAGICK_TIME_LIMIT",
            Resource::Throttle => "IMAGICK_THROTTLE_LIMIT",
            Resource::Width => "IMAGICK_WIDTH_LIMIT",
            Resource::Height => "IMAGICK_HEIGHT_LIMIT",
            Resource::ListLength => "IMAGICK_LIST_LENGTH_LIMIT",
        }
    }
}

/// Optional limit per resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceLimits {
    pub area: Option<u64>,
    pub disk: Option<u64>,
    pub file: Option<u64>,
    pub map: Option<u64>,
    pub memory: Option<u64>,
    pub thread: Option<u64>,
    pub time: Option<u64>,
    pub throttle: Option<u64>,
    pub width: Option<u64>,
    pub height: Option<u64>,
    pub list_length: Option<u64>,
}

impl ResourceLimits {
    pub fn get(&self, resource: Resource) -> Option<u64> {
        match resource {
            Resource::Area => self.area,
            Resource::Disk => self.disk,
            Resource::File => self.file,
            Resource::Map => self.map,
            Resource::Memory => self.memory,
            Resource::Thread => self.thread,
            Resource::Time => self.time,
            Resource::Throttle => self.throttle,
            Resource::Width => self.width,
            Resource::Height => self.height,
            Resource::ListLength => self.list_length,
        }
    }

    pub fn set(&mut self, resource: Resource, limit: Option<u64>) {
        let slot = match resource {
            Resource::Area => &mut self.area,
            Resource::Disk => &mut self.disk,
            Resource::File => &mut self.file,
            Resource::Map => &mut self.map,
            Resource::Memory => &mut self.memory,
            Resource::Thread => &mut self.thread,
            Resource::Time => &mut self.time,
            Resource::Throttle => &mut self.throttle,
            Resource::Width => &mut self.width,
            Resource::Height => &mut self.height,
            Resource::ListLength => &mut self.list_length,
        };
        *slot = limit;
    }

    /// Limits that are set, in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (Resource, u64)> + '_ {
        Resource::ALL
            .into_iter()
            .filter_map(move |resource| self.get(resource).map(|limit| (resource, limit)))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

/// Configuration applied at engine genesis
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub limits: ResourceLimits,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one resource limit
    pub fn with_limit(mut self, resource: Resource, limit: u64) -> Self {
        self.limits.set(resource, Some(limit));
        self
    }

    /// Read limits from `IMAGICK_*_LIMIT` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Config::default();
        for resource in Resource::ALL {
            let var = resource.env_var();
            if let Some(raw) = lookup(var) {
                let limit = raw.trim().parse::<u64>().map_err(|_| {
                    Error::invalid(format!("{var} must be an unsigned integer, got {raw:?}"))
                })?;
                config.limits.set(resource, Some(limit));
            }
        }
        Ok(config)
    }

    /// Push every configured limit into the running engine
    pub(crate) fn apply(&self) {
        for (resource, limit) in self.limits.iter() {
            let ok = unsafe {
                imagick_sys::is_true(imagick_sys::MagickSetResourceLimit(resource.to_ffi(), limit))
            };
            if ok {
                log::debug!("Set {:?} resource limit to {}", resource, limit);
            } else {
                log::warn!("Library rejected {:?} resource limit {}", resource, limit);
            }
        }
    }
}
