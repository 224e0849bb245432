//! Logger controller.
//!
//! The controller owns the persistent controller state, the storage layout,
//! all components, the data buffer and the collaborators. It is driven from
//! outside by three entry points:
//!
//! - `update()` - one tick of the driver loop
//! - `receive_command()` - one inbound remote command
//! - `capture_name()` - the device name reply of the service
//!
//! Each entry point runs to completion with `&mut self`; nothing else can
//! observe or mutate the controller in between.

use logger_common::config::LoggerConfig;
use logger_common::consts::{
    CMD_ROOT, CONTROLLER_STATE_ADDRESS, DATA_INFO_MAX_CHAR, DATA_INFO_VARIABLE, DATA_LOG_MAX_CHAR,
    DATA_LOG_WEBHOOK, DEVICE_NAME_MAX_CHARS, MAC_ADDRESS_LEN, NAME_REQUEST_CHANNEL, NAME_TOPIC,
    STATE_INFO_MAX_CHAR, STATE_INFO_VARIABLE, STATE_LOG_MAX_CHAR, STATE_LOG_WEBHOOK,
};
use logger_common::debug::DebugFlags;
use logger_common::device::{Clock, Display, PersistentStorage, Transport};
use heapless::String as FixedString;
use tracing::{debug, error, info, warn};

use crate::command::Command;
use crate::command::text::{
    data_logging_fragment, describe_period, locked_fragment, period_fragment,
    state_logging_fragment,
};
use crate::component::Component;
use crate::data::{DataBuffer, LogChunker};
use crate::display::{
    CONNECTION_ROW, MSG_CONNECTING, MSG_DATA_LOG_ERROR, MSG_DATA_LOG_SENT, MSG_DATA_LOG_TOO_BIG,
    MSG_RESETTING, MSG_STATE_LOG_TOO_BIG, STATUS_ROW, command_line, status_line, truncated,
};
use crate::error::{ControllerError, LayoutError, PayloadError, PublishError};
use crate::json::Fragment;
use crate::report::{
    assemble_data_information, assemble_startup_log, assemble_state_log, assemble_state_report,
    format_mac,
};
use crate::storage::{ControllerState, LoggingType, Record, StateStore, StorageLayout};

/// Storage participant id of the controller.
pub const CONTROLLER_ID: &str = "controller";

/// Device name as reported by the service.
pub type DeviceName = FixedString<DEVICE_NAME_MAX_CHARS>;

type NameCallback = Box<dyn FnMut(&str)>;
type CommandCallback = Box<dyn FnMut(&Command)>;
type DataCallback = Box<dyn FnMut(&str)>;
type PeriodValidator = Box<dyn Fn(LoggingType, i32) -> bool>;

/// Maximum sizes of the published payloads [bytes].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadLimits {
    /// State report.
    pub state_info: usize,
    /// Data information.
    pub data_info: usize,
    /// One state log.
    pub state_log: usize,
    /// One data log chunk.
    pub data_log: usize,
}

impl Default for PayloadLimits {
    fn default() -> Self {
        Self {
            state_info: STATE_INFO_MAX_CHAR,
            data_info: DATA_INFO_MAX_CHAR,
            state_log: STATE_LOG_MAX_CHAR,
            data_log: DATA_LOG_MAX_CHAR,
        }
    }
}

/// The platform collaborators of a controller.
pub struct Collaborators {
    /// Persistent storage region.
    pub storage: Box<dyn PersistentStorage>,
    /// Connection to the remote service.
    pub transport: Box<dyn Transport>,
    /// Time source.
    pub clock: Box<dyn Clock>,
    /// Character display.
    pub display: Box<dyn Display>,
}

/// Connection bookkeeping of the tick loop.
#[derive(Debug, Default)]
struct Connection {
    started: bool,
    connected: bool,
    name_handler_registered: bool,
    name_handler_succeeded: bool,
}

/// Flags valid for one command dispatch.
#[derive(Debug, Default)]
struct DispatchContext {
    /// Publish the state log even if state logging is off.
    override_state_log: bool,
}

/// Central logger controller.
pub struct Controller {
    version: String,
    name: DeviceName,
    mac: [u8; MAC_ADDRESS_LEN],
    state: StateStore<ControllerState>,
    layout: StorageLayout,
    components: Vec<Box<dyn Component>>,
    data: DataBuffer,
    chunker: LogChunker,
    storage: Box<dyn PersistentStorage>,
    transport: Box<dyn Transport>,
    clock: Box<dyn Clock>,
    display: Box<dyn Display>,
    debug: DebugFlags,
    limits: PayloadLimits,
    connection: Connection,
    context: DispatchContext,
    reset: bool,
    startup_logged: bool,
    last_data_log_ms: u64,
    state_report: String,
    data_information: String,
    state_log: String,
    data_log: String,
    name_callback: Option<NameCallback>,
    command_callback: Option<CommandCallback>,
    data_callback: Option<DataCallback>,
    period_validator: Option<PeriodValidator>,
}

impl Controller {
    /// Create a controller with default limits and no debug flags.
    ///
    /// # Errors
    /// `ControllerError::Layout` if the controller record does not fit in the
    /// storage.
    pub fn new(version: &str, collaborators: Collaborators) -> Result<Self, ControllerError> {
        let Collaborators {
            storage,
            transport,
            clock,
            display,
        } = collaborators;

        let layout = StorageLayout::new(storage.capacity(), CONTROLLER_ID, ControllerState::SIZE)?;
        let mut state = StateStore::new(CONTROLLER_ID, ControllerState::default());
        state.attach(CONTROLLER_STATE_ADDRESS);

        Ok(Self {
            version: version.to_string(),
            name: DeviceName::new(),
            mac: [0; MAC_ADDRESS_LEN],
            state,
            layout,
            components: Vec::new(),
            data: DataBuffer::new(),
            chunker: LogChunker::new(),
            storage,
            transport,
            clock,
            display,
            debug: DebugFlags::default(),
            limits: PayloadLimits::default(),
            connection: Connection::default(),
            context: DispatchContext::default(),
            reset: false,
            startup_logged: false,
            last_data_log_ms: 0,
            state_report: "{}".to_string(),
            data_information: "{}".to_string(),
            state_log: "{}".to_string(),
            data_log: "{}".to_string(),
            name_callback: None,
            command_callback: None,
            data_callback: None,
            period_validator: None,
        })
    }

    /// Create a controller configured from `config`.
    ///
    /// # Errors
    /// See `new()`.
    pub fn from_config(config: &LoggerConfig, collaborators: Collaborators) -> Result<Self, ControllerError> {
        let limits = PayloadLimits {
            state_info: config.device.state_info_max_bytes,
            data_info: config.device.data_info_max_bytes,
            state_log: config.device.state_log_max_bytes,
            data_log: config.device.data_log_max_bytes,
        };
        Ok(Self::new(&config.device.version, collaborators)?
            .with_debug(config.debug.flags())
            .with_limits(limits))
    }

    /// Set the debug categories.
    pub fn with_debug(mut self, debug: DebugFlags) -> Self {
        self.debug = debug;
        self
    }

    /// Set the payload limits.
    pub fn with_limits(mut self, limits: PayloadLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Replace the default controller state used when nothing can be restored.
    pub fn with_defaults(mut self, defaults: ControllerState) -> Self {
        self.state = StateStore::new(CONTROLLER_ID, defaults);
        self.state.attach(CONTROLLER_STATE_ADDRESS);
        self
    }

    // ─── Registration ───────────────────────────────────────────────

    /// Register a component and allocate its storage range.
    ///
    /// A component that does not fit in storage is not added; the
    /// controller keeps running without it.
    ///
    /// # Errors
    /// The `LayoutError` that refused the component.
    pub fn add_component(&mut self, mut component: Box<dyn Component>) -> Result<usize, LayoutError> {
        let offset = self.layout.register(component.id(), component.state_size())?;
        component.attach_storage(offset);
        info!("Adding component '{}' to the controller", component.id());
        self.components.push(component);
        Ok(offset)
    }

    // ─── Lifecycle ──────────────────────────────────────────────────

    /// Load all states, initialize the components and register with the
    /// transport.
    ///
    /// With `reset_requested`, controller and components start from their
    /// defaults and overwrite whatever is stored.
    ///
    /// # Errors
    /// `ControllerError::Layout` if the storage layout is inconsistent.
    pub fn init(&mut self, reset_requested: bool) -> Result<(), ControllerError> {
        info!("Initializing controller '{}'...", self.version);
        self.layout.validate()?;

        self.display.init();
        self.display.print_line(STATUS_ROW, &self.version);

        if reset_requested {
            self.reset = true;
            info!("Reset request detected");
            self.display.print_line_temporary(STATUS_ROW, MSG_RESETTING);
        }

        self.state.load(self.storage.as_mut(), self.reset);
        for component in &mut self.components {
            component.load_state(self.storage.as_mut(), self.reset);
        }
        for component in &mut self.components {
            component.init(&mut self.data);
        }

        info!("Startup time: {}", self.clock.format(self.clock.now()));

        info!("Registering logger cloud variables");
        self.transport.subscribe(NAME_TOPIC);
        if !self.transport.register_command_handler(CMD_ROOT) {
            warn!("Command function '{CMD_ROOT}' could not be registered");
        }
        self.transport
            .expose_readable_value(STATE_INFO_VARIABLE, &self.state_report);
        self.transport
            .expose_readable_value(DATA_INFO_VARIABLE, &self.data_information);
        if self.debug.webhooks_debug() {
            self.transport
                .expose_readable_value(STATE_LOG_WEBHOOK, &self.state_log);
            self.transport
                .expose_readable_value(DATA_LOG_WEBHOOK, &self.data_log);
        }

        self.last_data_log_ms = self.clock.monotonic_millis();
        Ok(())
    }

    /// One tick of the driver loop.
    pub fn update(&mut self) {
        self.update_connection();
        self.display.update();

        let now = self.clock.monotonic_millis();
        for component in &mut self.components {
            component.tick(now, &mut self.data);
        }

        if self.transport.is_connected()
            && !self.startup_logged
            && self.connection.name_handler_succeeded
        {
            self.complete_startup();
        }

        if self.is_time_for_data_log(now) {
            self.last_data_log_ms = now;
            self.log_data();
            self.update_data_information();
            self.clear_data(false);
        }
    }

    fn update_connection(&mut self) {
        if self.transport.is_connected() {
            if !self.connection.connected {
                self.on_connected();
            }
            self.transport.process();
        } else if self.connection.connected {
            info!(
                "Lost cloud connection at {}",
                self.clock.format(self.clock.now())
            );
            self.connection.started = false;
            self.connection.connected = false;
        } else if !self.connection.started {
            info!(
                "Initiating cloud connection at {}",
                self.clock.format(self.clock.now())
            );
            self.display.print_line(CONNECTION_ROW, MSG_CONNECTING);
            self.update_display_status();
            self.transport.connect();
            self.connection.started = true;
        }
    }

    fn on_connected(&mut self) {
        self.mac = self.transport.mac_address();
        info!("MAC address: {}", format_mac(&self.mac));
        info!(
            "Cloud connection established at {}",
            self.clock.format(self.clock.now())
        );
        self.connection.connected = true;
        self.display.print_line(CONNECTION_ROW, "");
        self.update_display_state();

        if !self.connection.name_handler_registered {
            self.connection.name_handler_registered =
                self.transport.publish(NAME_REQUEST_CHANNEL, "");
            if self.connection.name_handler_registered {
                info!("Name handler registered");
            }
        }
    }

    fn complete_startup(&mut self) {
        self.update_state_report();
        self.update_data_information();
        if self.state.get().state_logging {
            info!("Start-up completed");
            match assemble_startup_log(&self.name, self.limits.state_log) {
                Ok(log) => {
                    self.state_log = log;
                    if let Err(e) = self.publish_state_log() {
                        warn!("Startup log not published: {e}");
                    }
                }
                Err(e) => error!("Startup log not assembled: {e}"),
            }
        } else {
            info!("Start-up completed (not logged)");
        }
        self.startup_logged = true;
    }

    /// Store the device name delivered by the service.
    pub fn capture_name(&mut self, topic: &str, data: &str) {
        debug!("Name reply on '{topic}'");
        self.name = truncated(data);
        self.connection.name_handler_succeeded = true;
        info!("Logger name '{}'", self.name);
        self.display.print_line(STATUS_ROW, &self.name);
        if let Some(callback) = &mut self.name_callback {
            callback(self.name.as_str());
        }
    }

    // ─── Commands ───────────────────────────────────────────────────

    /// Dispatch one inbound command. Returns the result code for the
    /// transport.
    pub fn receive_command(&mut self, text: &str) -> i32 {
        let mut command = Command::load(text);
        command.extract_variable();
        self.context = DispatchContext::default();
        self.parse_command(&mut command);

        if !command.is_type_defined() {
            command.error_command();
        }

        self.display
            .print_line_temporary(STATUS_ROW, &command_line(&command));

        if self.debug.webhooks_debug() {
            debug!("Webhook debugging is on, state log is always assembled");
            self.context.override_state_log = true;
        }
        if self.state.get().state_logging || self.context.override_state_log {
            match assemble_state_log(&self.name, &command, self.limits.state_log) {
                Ok(log) => {
                    self.state_log = log;
                    if let Err(e) = self.publish_state_log() {
                        warn!("State log not published: {e}");
                    }
                }
                Err(e) => {
                    error!("State log not assembled: {e}");
                    self.display
                        .print_line_temporary(STATUS_ROW, MSG_STATE_LOG_TOO_BIG);
                }
            }
        }
        self.context.override_state_log = false;

        if command.result().is_some_and(|r| r.is_change()) {
            self.update_state_report();
        }

        if let Some(callback) = &mut self.command_callback {
            callback(&command);
        }

        command.code()
    }

    /// Offer `command` to the components in registration order.
    pub(crate) fn dispatch_to_components(&mut self, command: &mut Command) -> bool {
        let storage = self.storage.as_mut();
        self.components
            .iter_mut()
            .any(|component| component.parse_command(&mut *command, &mut *storage))
    }

    /// Whether a logging period passes the validity hook (always true without one).
    pub fn is_period_valid(&self, logging_type: LoggingType, period: i32) -> bool {
        self.period_validator
            .as_ref()
            .is_none_or(|valid| valid(logging_type, period))
    }

    // ─── State changes ──────────────────────────────────────────────

    /// Lock or unlock. Returns true if the state changed.
    pub fn change_locked(&mut self, on: bool) -> bool {
        let changed = self.state.update(self.storage.as_mut(), |s| {
            let changed = s.locked != on;
            s.locked = on;
            changed
        });
        if self.debug.contains(DebugFlags::STATE) {
            match (changed, on) {
                (true, true) => info!("Locking logger"),
                (true, false) => info!("Unlocking logger"),
                (false, true) => info!("Logger already locked"),
                (false, false) => info!("Logger already unlocked"),
            }
        }
        changed
    }

    /// Turn state logging on or off. A change is always logged.
    pub fn change_state_logging(&mut self, on: bool) -> bool {
        let changed = self.state.update(self.storage.as_mut(), |s| {
            let changed = s.state_logging != on;
            s.state_logging = on;
            changed
        });
        if changed {
            self.context.override_state_log = true;
        }
        if self.debug.contains(DebugFlags::STATE) {
            let on_off = if on { "on" } else { "off" };
            if changed {
                info!("State logging turned {on_off}");
            } else {
                info!("State logging already {on_off}");
            }
        }
        changed
    }

    /// Turn data logging on or off. Turning it on resets the data.
    pub fn change_data_logging(&mut self, on: bool) -> bool {
        let changed = self.state.update(self.storage.as_mut(), |s| {
            let changed = s.data_logging != on;
            s.data_logging = on;
            changed
        });
        if self.debug.contains(DebugFlags::STATE) {
            let on_off = if on { "on" } else { "off" };
            if changed {
                info!("Data logging turned {on_off}");
            } else {
                info!("Data logging already {on_off}");
            }
        }
        if changed && on {
            self.reset_data();
        }
        changed
    }

    /// Set the data logging period. Changed if either period or type differ.
    pub fn change_data_logging_period(&mut self, period: i32, logging_type: LoggingType) -> bool {
        let changed = self.state.update(self.storage.as_mut(), |s| {
            let changed =
                s.data_logging_period != period || s.data_logging_type != logging_type;
            s.data_logging_period = period;
            s.data_logging_type = logging_type;
            changed
        });
        if self.debug.contains(DebugFlags::STATE) {
            if changed {
                info!(
                    "Setting data logging period to {}",
                    describe_period(period, logging_type)
                );
            } else {
                info!(
                    "Data logging period unchanged ({})",
                    describe_period(period, logging_type)
                );
            }
        }
        changed
    }

    /// Mark the stored state stale so the next startup restores defaults.
    pub fn reset_state_on_next_startup(&mut self) {
        self.state.update(self.storage.as_mut(), |s| {
            s.set_version(0);
            true
        });
        info!("Controller state will be reset on next startup");
    }

    // ─── Data ───────────────────────────────────────────────────────

    /// Clear accumulated readings. `all` also forgets the latest values.
    pub fn clear_data(&mut self, all: bool) {
        if self.debug.contains(DebugFlags::DATA) {
            info!(
                "Clearing data at {}",
                self.clock.format(self.clock.now())
            );
        }
        self.data.clear(all);
    }

    /// Clear all readings completely.
    pub fn reset_data(&mut self) {
        self.clear_data(true);
    }

    fn is_time_for_data_log(&self, now_ms: u64) -> bool {
        let state = self.state.get();
        let due = self.data.is_due(
            state.data_logging_type,
            state.data_logging_period,
            now_ms.saturating_sub(self.last_data_log_ms),
        );
        if due && self.debug.contains(DebugFlags::DATA) {
            info!(
                "Triggering data log at {} (after {})",
                self.clock.format(self.clock.now()),
                describe_period(state.data_logging_period, state.data_logging_type)
            );
        }
        due
    }

    /// Run one data log cycle: assemble and publish chunks until nothing is
    /// left. Does nothing if data logging is off (unless webhook debugging).
    pub fn log_data(&mut self) {
        if !(self.state.get().data_logging || self.debug.webhooks_debug()) {
            if self.debug.contains(DebugFlags::CLOUD) {
                info!("Data log is turned off, continuing without logging");
            }
            return;
        }

        let now = self.clock.monotonic_millis();
        self.chunker.reset();
        loop {
            match self
                .chunker
                .assemble(&self.data, &self.name, now, true, self.limits.data_log)
            {
                Ok(Some(chunk)) => {
                    self.data_log = chunk;
                    if let Err(e) = self.publish_data_log() {
                        warn!("Data log not published: {e}");
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    self.report_data_log_overflow(&e);
                }
            }
        }
    }

    fn report_data_log_overflow(&mut self, e: &PayloadError) {
        error!("Data log entry skipped: {e}");
        self.display
            .print_line_temporary(STATUS_ROW, MSG_DATA_LOG_TOO_BIG);
    }

    fn publish_data_log(&mut self) -> Result<(), PublishError> {
        if self.data_log.is_empty() {
            return Err(PublishError::Empty {
                channel: DATA_LOG_WEBHOOK.to_string(),
            });
        }
        if self.debug.contains(DebugFlags::CLOUD) {
            if !self.state.get().data_logging {
                warn!("Publishing data log despite data logging turned off");
            }
            info!(
                "Publishing data log '{}' until data index {:?} to event '{DATA_LOG_WEBHOOK}'",
                self.data_log,
                self.chunker.watermark()
            );
        }
        if self.debug.webhooks_debug() {
            self.transport
                .expose_readable_value(DATA_LOG_WEBHOOK, &self.data_log);
            return Err(PublishError::Suppressed {
                channel: DATA_LOG_WEBHOOK.to_string(),
            });
        }

        let result = if !self.transport.is_connected() {
            Err(PublishError::NotConnected)
        } else if self.transport.publish(DATA_LOG_WEBHOOK, &self.data_log) {
            Ok(())
        } else {
            Err(PublishError::TransportFailure {
                channel: DATA_LOG_WEBHOOK.to_string(),
            })
        };
        let flash = if result.is_ok() {
            MSG_DATA_LOG_SENT
        } else {
            MSG_DATA_LOG_ERROR
        };
        self.display.print_line_temporary(STATUS_ROW, flash);
        result
    }

    fn publish_state_log(&mut self) -> Result<(), PublishError> {
        if self.debug.contains(DebugFlags::CLOUD) {
            info!(
                "Publishing state log {} to event '{STATE_LOG_WEBHOOK}'",
                self.state_log
            );
        }
        if self.debug.webhooks_debug() {
            self.transport
                .expose_readable_value(STATE_LOG_WEBHOOK, &self.state_log);
            return Err(PublishError::Suppressed {
                channel: STATE_LOG_WEBHOOK.to_string(),
            });
        }
        if !self.transport.is_connected() {
            return Err(PublishError::NotConnected);
        }
        if self.transport.publish(STATE_LOG_WEBHOOK, &self.state_log) {
            Ok(())
        } else {
            Err(PublishError::TransportFailure {
                channel: STATE_LOG_WEBHOOK.to_string(),
            })
        }
    }

    // ─── Reports ────────────────────────────────────────────────────

    /// Controller entries of the state report.
    pub fn state_fragments(&self) -> Vec<Fragment> {
        let state = self.state.get();
        vec![
            locked_fragment(state.locked),
            state_logging_fragment(state.state_logging),
            data_logging_fragment(state.data_logging),
            period_fragment(state.data_logging_period, state.data_logging_type),
        ]
    }

    /// Assemble the state report of controller and components. Pure.
    ///
    /// # Errors
    /// `PayloadTooLarge` if the report exceeds the state info limit.
    pub fn assemble_state_report(&self) -> Result<String, PayloadError> {
        let mut fragments = self.state_fragments();
        for component in &self.components {
            fragments.extend(component.assemble_state_fragment());
        }
        let dt = self.clock.format(self.clock.now());
        assemble_state_report(&dt, &self.version, &self.mac, &fragments, self.limits.state_info)
    }

    /// Refresh the display and rebuild and post the state report.
    pub fn update_state_report(&mut self) {
        self.update_display_state();
        match self.assemble_state_report() {
            Ok(report) => {
                self.state_report = report;
                if self.debug.contains(DebugFlags::CLOUD) {
                    info!("Updating state variable: {}", self.state_report);
                }
                if let Err(e) = self.post_value(STATE_INFO_VARIABLE, Value::StateReport) {
                    warn!("State report not posted: {e}");
                }
            }
            Err(e) => error!("State report not assembled: {e}"),
        }
    }

    /// Rebuild and post the data information.
    pub fn update_data_information(&mut self) {
        let dt = self.clock.format(self.clock.now());
        match assemble_data_information(&dt, &self.data.info_fragments(), self.limits.data_info) {
            Ok(info) => {
                self.data_information = info;
                if self.debug.contains(DebugFlags::CLOUD) {
                    info!("Updating data information: {}", self.data_information);
                }
                if let Err(e) = self.post_value(DATA_INFO_VARIABLE, Value::DataInformation) {
                    warn!("Data information not posted: {e}");
                }
            }
            Err(e) => error!("Data information not assembled: {e}"),
        }
        if let Some(callback) = &mut self.data_callback {
            callback(self.data_information.as_str());
        }
    }

    fn post_value(&mut self, name: &str, value: Value) -> Result<(), PublishError> {
        if !self.transport.is_connected() {
            return Err(PublishError::NotConnected);
        }
        let text = match value {
            Value::StateReport => &self.state_report,
            Value::DataInformation => &self.data_information,
        };
        self.transport.expose_readable_value(name, text);
        Ok(())
    }

    // ─── Display ────────────────────────────────────────────────────

    fn update_display_status(&mut self) {
        if self.connection.name_handler_succeeded {
            self.display.print_line(STATUS_ROW, &self.name);
        }
        let line = status_line(self.transport.is_connected(), self.state.get());
        self.display.print_line_right_aligned(STATUS_ROW, &line);
    }

    fn update_display_state(&mut self) {
        self.update_display_status();
        for component in &mut self.components {
            component.update_display_state(self.display.as_mut());
        }
    }

    // ─── Observers ──────────────────────────────────────────────────

    /// Called with the device name once it is captured.
    pub fn set_name_callback(&mut self, callback: impl FnMut(&str) + 'static) {
        self.name_callback = Some(Box::new(callback));
    }

    /// Called with every dispatched command after logging and reporting.
    pub fn set_command_callback(&mut self, callback: impl FnMut(&Command) + 'static) {
        self.command_callback = Some(Box::new(callback));
    }

    /// Called with the data information after every update.
    pub fn set_data_callback(&mut self, callback: impl FnMut(&str) + 'static) {
        self.data_callback = Some(Box::new(callback));
    }

    /// Hook that may reject an otherwise well-formed logging period.
    pub fn set_period_validator(&mut self, validator: impl Fn(LoggingType, i32) -> bool + 'static) {
        self.period_validator = Some(Box::new(validator));
    }

    // ─── Accessors ──────────────────────────────────────────────────

    /// Firmware version string.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Device name (empty until captured).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current controller state.
    #[inline]
    pub fn state(&self) -> &ControllerState {
        self.state.get()
    }

    /// Storage layout.
    pub fn layout(&self) -> &StorageLayout {
        &self.layout
    }

    /// Number of registered components.
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Accumulated readings.
    pub fn data(&self) -> &DataBuffer {
        &self.data
    }

    /// Accumulated readings, for feeding external sensor values.
    pub fn data_mut(&mut self) -> &mut DataBuffer {
        &mut self.data
    }

    /// Last posted state report.
    pub fn state_report(&self) -> &str {
        &self.state_report
    }

    /// Last posted data information.
    pub fn data_information(&self) -> &str {
        &self.data_information
    }

    /// Last assembled state log.
    pub fn last_state_log(&self) -> &str {
        &self.state_log
    }

    /// Last assembled data log chunk.
    pub fn last_data_log(&self) -> &str {
        &self.data_log
    }

    /// Whether the controller was started with a reset request.
    pub fn was_reset(&self) -> bool {
        self.reset
    }

    /// Whether the tick loop considers the transport connected.
    pub fn is_connected(&self) -> bool {
        self.connection.connected
    }

    /// Whether the device name was requested from the service.
    pub fn is_name_requested(&self) -> bool {
        self.connection.name_handler_registered
    }

    /// Whether the device name is known.
    pub fn is_name_known(&self) -> bool {
        self.connection.name_handler_succeeded
    }

    /// Whether the startup completion ran.
    pub fn is_startup_logged(&self) -> bool {
        self.startup_logged
    }
}

/// Readable values posted through `post_value`.
#[derive(Debug, Clone, Copy)]
enum Value {
    StateReport,
    DataInformation,
}
