//! Host collaborators.
//!
//! In-memory and console implementations of the collaborator traits, used
//! by the `logger_sim` binary and by the tests. Handles are cheap clones
//! sharing one state, so a test can keep a handle after moving another into
//! the controller.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use logger_common::consts::{DISPLAY_COLS, DISPLAY_ROWS, DISPLAY_TEMP_MESSAGE_MS, ERASED_BYTE, MAC_ADDRESS_LEN};
use logger_common::device::{Clock, Display, PersistentStorage, StorageError, Transport, check_bounds};
use tracing::{debug, info, warn};

// ─── Storage ────────────────────────────────────────────────────────

#[derive(Debug)]
struct MemoryImage {
    bytes: Vec<u8>,
    writes: usize,
}

/// Volatile storage, erased (`0xFF`) on creation.
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    image: Rc<RefCell<MemoryImage>>,
}

impl MemoryStorage {
    /// Create an erased storage region of `capacity` bytes.
    pub fn new(capacity: usize) -> Self {
        Self {
            image: Rc::new(RefCell::new(MemoryImage {
                bytes: vec![ERASED_BYTE; capacity],
                writes: 0,
            })),
        }
    }

    /// Number of write calls so far.
    pub fn write_count(&self) -> usize {
        self.image.borrow().writes
    }

    /// Copy of the whole region.
    pub fn snapshot(&self) -> Vec<u8> {
        self.image.borrow().bytes.clone()
    }
}

impl PersistentStorage for MemoryStorage {
    fn capacity(&self) -> usize {
        self.image.borrow().bytes.len()
    }

    fn read(&self, offset: usize, size: usize) -> Result<Vec<u8>, StorageError> {
        let image = self.image.borrow();
        check_bounds(image.bytes.len(), offset, size)?;
        Ok(image.bytes[offset..offset + size].to_vec())
    }

    fn write(&mut self, offset: usize, bytes: &[u8]) -> Result<(), StorageError> {
        let mut image = self.image.borrow_mut();
        check_bounds(image.bytes.len(), offset, bytes.len())?;
        image.bytes[offset..offset + bytes.len()].copy_from_slice(bytes);
        image.writes += 1;
        Ok(())
    }
}

/// Storage backed by an image file, rewritten on every write.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    bytes: Vec<u8>,
}

impl FileStorage {
    /// Open the image at `path`, or start erased if it does not exist.
    ///
    /// A shorter image is padded with erased bytes, a longer one truncated.
    ///
    /// # Errors
    /// Returns `StorageError::Io` if an existing file cannot be read.
    pub fn open<P: AsRef<Path>>(path: P, capacity: usize) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let mut bytes = if path.exists() {
            fs::read(&path)
                .map_err(|e| StorageError::Io(format!("Failed to read {}: {e}", path.display())))?
        } else {
            debug!("Storage image {:?} does not exist, starting erased", path);
            Vec::new()
        };
        if bytes.len() != capacity {
            info!(
                "Storage image {:?} has {} bytes, resizing to {capacity}",
                path,
                bytes.len()
            );
            bytes.resize(capacity, ERASED_BYTE);
        }
        Ok(Self { path, bytes })
    }

    /// Path of the image file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| StorageError::Io(format!("Failed to create directory: {e}")))?;
        }
        fs::write(&self.path, &self.bytes)
            .map_err(|e| StorageError::Io(format!("Failed to write {}: {e}", self.path.display())))
    }
}

impl PersistentStorage for FileStorage {
    fn capacity(&self) -> usize {
        self.bytes.len()
    }

    fn read(&self, offset: usize, size: usize) -> Result<Vec<u8>, StorageError> {
        check_bounds(self.bytes.len(), offset, size)?;
        Ok(self.bytes[offset..offset + size].to_vec())
    }

    fn write(&mut self, offset: usize, bytes: &[u8]) -> Result<(), StorageError> {
        check_bounds(self.bytes.len(), offset, bytes.len())?;
        self.bytes[offset..offset + bytes.len()].copy_from_slice(bytes);
        self.persist()
    }
}

// ─── Transport ──────────────────────────────────────────────────────

#[derive(Debug)]
struct Link {
    connected: bool,
    auto_connect: bool,
    publish_ok: bool,
    connect_requests: usize,
    mac: [u8; MAC_ADDRESS_LEN],
    published: Vec<(String, String)>,
    values: BTreeMap<String, String>,
    handlers: Vec<String>,
    subscriptions: Vec<String>,
}

/// Transport that records everything and logs it.
///
/// `connect()` brings the link up immediately unless auto-connect is
/// disabled.
#[derive(Debug, Clone)]
pub struct ConsoleTransport {
    link: Rc<RefCell<Link>>,
}

impl Default for ConsoleTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleTransport {
    /// Create a disconnected transport.
    pub fn new() -> Self {
        Self {
            link: Rc::new(RefCell::new(Link {
                connected: false,
                auto_connect: true,
                publish_ok: true,
                connect_requests: 0,
                mac: [0x02, 0x00, 0x00, 0x00, 0x00, 0x01],
                published: Vec::new(),
                values: BTreeMap::new(),
                handlers: Vec::new(),
                subscriptions: Vec::new(),
            })),
        }
    }

    /// Force the connection state.
    pub fn set_connected(&self, connected: bool) {
        self.link.borrow_mut().connected = connected;
    }

    /// Whether `connect()` brings the link up.
    pub fn set_auto_connect(&self, auto_connect: bool) {
        self.link.borrow_mut().auto_connect = auto_connect;
    }

    /// Whether publishes are acknowledged.
    pub fn set_publish_ok(&self, ok: bool) {
        self.link.borrow_mut().publish_ok = ok;
    }

    /// Set the reported hardware address.
    pub fn set_mac(&self, mac: [u8; MAC_ADDRESS_LEN]) {
        self.link.borrow_mut().mac = mac;
    }

    /// Number of `connect()` calls.
    pub fn connect_requests(&self) -> usize {
        self.link.borrow().connect_requests
    }

    /// All publish attempts `(channel, payload)` in order, acknowledged or not.
    pub fn published(&self) -> Vec<(String, String)> {
        self.link.borrow().published.clone()
    }

    /// Payloads published on `channel`.
    pub fn published_on(&self, channel: &str) -> Vec<String> {
        self.link
            .borrow()
            .published
            .iter()
            .filter(|(c, _)| c == channel)
            .map(|(_, p)| p.clone())
            .collect()
    }

    /// Forget recorded publishes.
    pub fn clear_published(&self) {
        self.link.borrow_mut().published.clear();
    }

    /// Current readable value `name`.
    pub fn value(&self, name: &str) -> Option<String> {
        self.link.borrow().values.get(name).cloned()
    }

    /// Registered command function names.
    pub fn handlers(&self) -> Vec<String> {
        self.link.borrow().handlers.clone()
    }

    /// Subscribed topics.
    pub fn subscriptions(&self) -> Vec<String> {
        self.link.borrow().subscriptions.clone()
    }
}

impl Transport for ConsoleTransport {
    fn is_connected(&self) -> bool {
        self.link.borrow().connected
    }

    fn connect(&mut self) {
        let mut link = self.link.borrow_mut();
        link.connect_requests += 1;
        if link.auto_connect {
            link.connected = true;
        }
    }

    fn mac_address(&self) -> [u8; MAC_ADDRESS_LEN] {
        self.link.borrow().mac
    }

    fn publish(&mut self, channel: &str, payload: &str) -> bool {
        let mut link = self.link.borrow_mut();
        link.published.push((channel.to_string(), payload.to_string()));
        let ok = link.connected && link.publish_ok;
        if ok {
            info!("Published to '{channel}': {payload}");
        } else {
            warn!("Publish to '{channel}' not acknowledged");
        }
        ok
    }

    fn register_command_handler(&mut self, name: &str) -> bool {
        debug!("Command function '{name}' registered");
        self.link.borrow_mut().handlers.push(name.to_string());
        true
    }

    fn expose_readable_value(&mut self, name: &str, value: &str) {
        debug!("Readable value '{name}' = {value}");
        self.link
            .borrow_mut()
            .values
            .insert(name.to_string(), value.to_string());
    }

    fn subscribe(&mut self, topic: &str) -> bool {
        debug!("Subscribed to '{topic}'");
        self.link.borrow_mut().subscriptions.push(topic.to_string());
        true
    }
}

// ─── Clocks ─────────────────────────────────────────────────────────

fn format_utc(timestamp: i64) -> String {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

/// Wall clock of the host.
#[derive(Debug, Clone)]
pub struct SystemClock {
    started: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    /// Start the monotonic counter now.
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        Utc::now().timestamp()
    }

    fn monotonic_millis(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    fn format(&self, timestamp: i64) -> String {
        format_utc(timestamp)
    }
}

/// Clock advanced explicitly by the caller.
#[derive(Debug, Clone)]
pub struct ManualClock {
    millis: Rc<Cell<u64>>,
    epoch: i64,
}

impl ManualClock {
    /// Create a clock at `epoch` seconds, 0 ms since start.
    pub fn new(epoch: i64) -> Self {
        Self {
            millis: Rc::new(Cell::new(0)),
            epoch,
        }
    }

    /// Advance by `ms` milliseconds.
    pub fn advance(&self, ms: u64) {
        self.millis.set(self.millis.get() + ms);
    }

    /// Set the milliseconds since start.
    pub fn set_millis(&self, ms: u64) {
        self.millis.set(ms);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> i64 {
        let elapsed = i64::try_from(self.millis.get() / 1000).unwrap_or(i64::MAX);
        self.epoch.saturating_add(elapsed)
    }

    fn monotonic_millis(&self) -> u64 {
        self.millis.get()
    }

    fn format(&self, timestamp: i64) -> String {
        format_utc(timestamp)
    }
}

// ─── Display ────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct Screen {
    rows: Vec<String>,
    temporary: Vec<Option<(String, Instant)>>,
    flashes: Vec<String>,
}

/// Character display rendered to the log.
#[derive(Debug, Clone)]
pub struct ConsoleDisplay {
    screen: Rc<RefCell<Screen>>,
    temp_duration: Duration,
}

impl Default for ConsoleDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleDisplay {
    /// Create a blank display.
    pub fn new() -> Self {
        let rows = usize::from(DISPLAY_ROWS);
        Self {
            screen: Rc::new(RefCell::new(Screen {
                rows: vec![String::new(); rows],
                temporary: vec![None; rows],
                flashes: Vec::new(),
            })),
            temp_duration: Duration::from_millis(DISPLAY_TEMP_MESSAGE_MS),
        }
    }

    fn index(row: u8) -> Option<usize> {
        (1..=DISPLAY_ROWS).contains(&row).then(|| usize::from(row - 1))
    }

    fn clip(text: &str) -> String {
        text.chars().take(DISPLAY_COLS).collect()
    }

    /// Permanent text of `row`.
    pub fn row(&self, row: u8) -> String {
        Self::index(row)
            .and_then(|i| self.screen.borrow().rows.get(i).cloned())
            .unwrap_or_default()
    }

    /// Text currently visible on `row` (a temporary message wins).
    pub fn visible(&self, row: u8) -> String {
        let Some(i) = Self::index(row) else {
            return String::new();
        };
        let screen = self.screen.borrow();
        match &screen.temporary[i] {
            Some((text, _)) => text.clone(),
            None => screen.rows[i].clone(),
        }
    }

    /// Every temporary message shown so far, in order.
    pub fn flashes(&self) -> Vec<String> {
        self.screen.borrow().flashes.clone()
    }
}

impl Display for ConsoleDisplay {
    fn init(&mut self) {
        let mut screen = self.screen.borrow_mut();
        screen.rows.iter_mut().for_each(String::clear);
        screen.temporary.iter_mut().for_each(|t| *t = None);
    }

    fn update(&mut self) {
        let mut screen = self.screen.borrow_mut();
        let duration = self.temp_duration;
        for slot in &mut screen.temporary {
            if slot.as_ref().is_some_and(|(_, since)| since.elapsed() >= duration) {
                *slot = None;
            }
        }
    }

    fn print_line(&mut self, row: u8, text: &str) {
        let Some(i) = Self::index(row) else {
            warn!("Display row {row} does not exist");
            return;
        };
        let text = Self::clip(text);
        debug!("Display [{row}] {text}");
        self.screen.borrow_mut().rows[i] = text;
    }

    fn print_line_temporary(&mut self, row: u8, text: &str) {
        let Some(i) = Self::index(row) else {
            warn!("Display row {row} does not exist");
            return;
        };
        let text = Self::clip(text);
        info!("Display [{row}] {text}");
        let mut screen = self.screen.borrow_mut();
        screen.flashes.push(text.clone());
        screen.temporary[i] = Some((text, Instant::now()));
    }

    fn print_line_right_aligned(&mut self, row: u8, text: &str) {
        let Some(i) = Self::index(row) else {
            warn!("Display row {row} does not exist");
            return;
        };
        let text = Self::clip(text);
        let right = text.chars().count();
        let mut screen = self.screen.borrow_mut();
        let left: String = screen.rows[i]
            .chars()
            .chain(std::iter::repeat(' '))
            .take(DISPLAY_COLS - right)
            .collect();
        let line = format!("{left}{text}");
        debug!("Display [{row}] {line}");
        screen.rows[i] = line;
    }
}
