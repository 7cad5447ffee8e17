//! Application state and the operation dispatcher

use std::sync::Arc;
use std::sync::mpsc::{Receiver, channel};
use std::time::Duration;

use tracing::debug;

use crate::async_io::manager::IoManager;
use crate::async_io::{IoRequest, IoResponse};
use crate::config::{Config, PackFormat};
use crate::errors::AppResult;
use crate::menu::{MenuAction, build_menu};
use crate::ops::{self, Operation, TransferDecision, TransferKind};
use crate::remote::{
    OpDescriptor, OperatorEvent, OperatorLink, RestClient, base_name, join_remote, parent_remote,
};
use crate::state::Side;
use crate::state::background::{OpCall, OpTask, RefreshPlan};
use crate::state::mode::Mode;
use crate::state::panel::{Panel, PendingSelect};
use crate::term::TermContext;
use crate::transport::{
    LinkState, LiveTransport, RestTransport, TransportRegistry, TransportSelector,
};

pub const TITLE: &str = "wharf";

pub struct App {
    pub config: Config,
    pub packer: PackFormat,
    pub left_panel: Panel,
    pub right_panel: Panel,
    pub active_panel: Side,
    pub mode: Mode,
    pub should_quit: bool,
    /// Mirrored from the selector for the status bar
    pub link_state: LinkState,
    rest: Arc<RestClient>,
    registry: Arc<TransportRegistry>,
    selector: Option<TransportSelector>,
    operator_events: Option<Receiver<OperatorEvent>>,
    io: IoManager,
    op_task: Option<OpTask>,
}

impl App {
    pub fn new(config: Config) -> AppResult<Self> {
        let packer = config.packer()?;

        let rest = Arc::new(RestClient::new(
            &config.server.url,
            &config.auth.username,
            &config.auth.password,
            Duration::from_secs(config.operator.call_timeout_secs),
        )?);

        let rest_transport: Arc<dyn crate::transport::Transport> =
            Arc::new(RestTransport::new(Arc::clone(&rest)));
        let registry = Arc::new(TransportRegistry::new(Arc::clone(&rest_transport)));

        // The operator link only exists when configured and the tree is
        // not on external storage; REST stays the sole transport otherwise.
        let (selector, operator_events) = if config.operator_wanted() {
            let (tx, rx) = channel();
            let link = OperatorLink::spawn(
                config.server.operator_addr.clone(),
                Duration::from_secs(config.operator.reconnect_secs),
                Duration::from_secs(config.operator.call_timeout_secs),
                tx,
            );
            let live: Arc<dyn crate::transport::Transport> =
                Arc::new(LiveTransport::new(link.clone()));
            let selector = TransportSelector::new(
                Arc::clone(&registry),
                rest_transport,
                live,
                Box::new(link),
                config.auth.username.clone(),
                config.auth.password.clone(),
            );
            (Some(selector), Some(rx))
        } else {
            (None, None)
        };

        let show_hidden = config.display.show_hidden;
        let mut app = Self {
            config,
            packer,
            left_panel: Panel::new("/", show_hidden),
            right_panel: Panel::new("/", show_hidden),
            active_panel: Side::Left,
            mode: Mode::Normal,
            should_quit: false,
            link_state: LinkState::Disconnected,
            rest,
            registry,
            selector,
            operator_events,
            io: IoManager::new(),
            op_task: None,
        };
        app.request_listing(Side::Left);
        app.request_listing(Side::Right);
        Ok(app)
    }

    /// The dispatcher is live once both panels have a listing
    pub fn loaded(&self) -> bool {
        self.left_panel.loaded_once && self.right_panel.loaded_once
    }

    pub fn panel(&self, side: Side) -> &Panel {
        match side {
            Side::Left => &self.left_panel,
            Side::Right => &self.right_panel,
        }
    }

    pub fn panel_mut(&mut self, side: Side) -> &mut Panel {
        match side {
            Side::Left => &mut self.left_panel,
            Side::Right => &mut self.right_panel,
        }
    }

    pub fn active_panel(&self) -> &Panel {
        self.panel(self.active_panel)
    }

    pub fn active_panel_mut(&mut self) -> &mut Panel {
        self.panel_mut(self.active_panel)
    }

    pub fn inactive_panel(&self) -> &Panel {
        self.panel(self.active_panel.other())
    }

    pub fn toggle_panel(&mut self) {
        self.active_panel = self.active_panel.other();
    }

    /// Ask the I/O worker for a fresh listing of the panel's directory
    pub fn request_listing(&mut self, side: Side) {
        let client = Arc::clone(&self.rest);
        let panel = self.panel_mut(side);
        panel.loading = true;
        let path = panel.path.clone();
        self.io.send(IoRequest::List(side, path, client));
    }

    pub fn refresh_panels(&mut self) {
        self.request_listing(Side::Left);
        self.request_listing(Side::Right);
    }

    /// Enter the focused directory, or go up on the parent entry
    pub fn enter(&mut self) {
        let panel = self.active_panel();
        let Some(entry) = panel.current_entry() else {
            return;
        };
        if entry.name == ".." {
            self.go_parent();
            return;
        }
        if entry.is_dir() {
            let path = join_remote(&panel.path, &entry.name);
            self.navigate(path, None);
        }
    }

    pub fn go_parent(&mut self) {
        let panel = self.active_panel();
        if let Some(parent) = parent_remote(&panel.path) {
            // Focus the directory we came out of
            let came_from = base_name(&panel.path).to_string();
            self.navigate(parent, Some(came_from));
        }
    }

    fn navigate(&mut self, path: String, select: Option<String>) {
        let side = self.active_panel;
        let panel = self.panel_mut(side);
        panel.path = path;
        panel.selected.clear();
        panel.entries.clear();
        panel.cursor = 0;
        panel.scroll_offset = 0;
        panel.pending_select = select.map(PendingSelect::Name);
        self.request_listing(side);
    }

    /// Drain pending events from the operator link, the listing worker,
    /// and any running operation. Called from the event loop every tick.
    pub fn poll(&mut self) {
        let events: Vec<OperatorEvent> = match &self.operator_events {
            Some(rx) => rx.try_iter().collect(),
            None => Vec::new(),
        };
        for event in events {
            let Some(selector) = self.selector.as_mut() else {
                break;
            };
            let alert = selector.handle_event(event);
            self.link_state = selector.state();
            if let Some(message) = alert {
                self.alert(message.to_string());
            }
        }

        while let Some(response) = self.io.try_recv() {
            match response {
                IoResponse::Listed(side, listing) => {
                    self.panel_mut(side).apply_listing(listing);
                }
                IoResponse::Error(side, path, message) => {
                    debug!(%path, "listing failed: {}", message);
                    self.panel_mut(side).apply_error(message);
                }
            }
        }

        if let Some(outcome) = self.op_task.as_ref().and_then(|task| task.try_recv()) {
            self.op_task = None;
            if matches!(self.mode, Mode::Progress { .. }) {
                self.mode = Mode::Normal;
            }
            match outcome.result {
                Ok(()) => {
                    let side = self.active_panel;
                    self.panel_mut(side).pending_select = Some(outcome.refresh.select);
                    self.request_listing(side);
                    if outcome.refresh.passive {
                        self.request_listing(side.other());
                    }
                }
                // Failed mutation: surface the error, suppress the refresh
                Err(e) => self.alert(e.to_string()),
            }
        }
    }

    pub fn tick_spinner(&mut self) {
        if let Mode::Progress { frame, .. } = &mut self.mode {
            *frame = frame.wrapping_add(1);
        }
    }

    /// Uniform dispatch entry. No-ops until the initial listings are in.
    pub fn show(&mut self, operation: Operation, data: Option<OpDescriptor>) {
        if !self.loaded() {
            return;
        }
        match operation {
            Operation::Copy => self.transfer(TransferKind::Copy, data),
            Operation::Move => self.transfer(TransferKind::Move, data),
            Operation::Delete => self.prompt_delete(),
            Operation::DeleteSilent => self.delete_silent(),
            Operation::Pack => self.pack(),
            Operation::Extract => self.extract(),
        }
    }

    fn transfer(&mut self, kind: TransferKind, data: Option<OpDescriptor>) {
        if let Some(descriptor) = data {
            // Caller-supplied descriptor skips the destination prompt
            self.submit_transfer(kind, descriptor.from, descriptor.names, descriptor.to);
            return;
        }

        let snapshot = self.active_panel().snapshot();
        let names = snapshot.active_names();
        if names.is_empty() {
            self.alert_no_files();
            return;
        }
        let dest = self.inactive_panel().path.clone();
        self.mode = Mode::Transfer {
            kind,
            from: snapshot.dir,
            names,
            dest_input: crate::input::InputLine::new(dest),
            focus: 0,
        };
    }

    /// Destination is final; decide between overwrite confirmation and
    /// running right away.
    pub fn submit_transfer(
        &mut self,
        kind: TransferKind,
        from: String,
        names: Vec<String>,
        to: String,
    ) {
        let confirm = match kind {
            TransferKind::Copy => self.config.confirmations.copy,
            TransferKind::Move => self.config.confirmations.mv,
        };
        let current = self.active_panel().current_name().map(|s| s.to_string());
        let destination_names = self.inactive_panel().names();

        match ops::decide_transfer(
            &from,
            &to,
            names,
            current.as_deref(),
            &destination_names,
            confirm,
        ) {
            TransferDecision::Reject => {
                self.mode = Mode::Normal;
            }
            TransferDecision::Confirm { descriptor, name } => {
                self.mode = Mode::OverwriteConfirm {
                    kind,
                    descriptor,
                    name,
                    focus: 0,
                };
            }
            TransferDecision::Run { descriptor } => self.run_transfer(kind, descriptor),
        }
    }

    pub fn run_transfer(&mut self, kind: TransferKind, descriptor: OpDescriptor) {
        let select = PendingSelect::Name(descriptor.names.first().cloned().unwrap_or_default());
        let call = match kind {
            TransferKind::Copy => OpCall::Copy(descriptor),
            TransferKind::Move => OpCall::Move(descriptor),
        };
        self.start_operation(
            call,
            RefreshPlan {
                passive: true,
                select,
            },
        );
    }

    fn prompt_delete(&mut self) {
        let snapshot = self.active_panel().snapshot();
        let Some(message) = ops::delete_prompt_message(&snapshot) else {
            self.alert_no_files();
            return;
        };
        if !self.config.confirmations.delete {
            self.delete_silent();
            return;
        }
        self.mode = Mode::ConfirmDelete { message, focus: 0 };
    }

    pub fn delete_silent(&mut self) {
        let snapshot = self.active_panel().snapshot();
        let Some(plan) = ops::delete_plan(&snapshot) else {
            self.alert_no_files();
            return;
        };
        let refresh = RefreshPlan {
            passive: false,
            select: PendingSelect::CurrentOr {
                current: plan.current_name.clone(),
                fallback: plan.next_current.clone(),
            },
        };
        self.start_operation(OpCall::Remove(plan.descriptor), refresh);
    }

    fn pack(&mut self) {
        let snapshot = self.active_panel().snapshot();
        let Some(plan) = ops::pack_plan(&snapshot, self.packer) else {
            self.alert_no_files();
            return;
        };
        let refresh = RefreshPlan {
            passive: false,
            select: PendingSelect::Name(plan.reselect),
        };
        self.start_operation(OpCall::Pack(plan.format, plan.descriptor), refresh);
    }

    fn extract(&mut self) {
        let snapshot = self.active_panel().snapshot();
        let Some(plan) = ops::extract_plan(&snapshot) else {
            self.alert_no_files();
            return;
        };
        let refresh = RefreshPlan {
            passive: false,
            select: PendingSelect::Name(plan.reselect),
        };
        self.start_operation(OpCall::Extract(plan.descriptor), refresh);
    }

    fn start_operation(&mut self, call: OpCall, refresh: RefreshPlan) {
        let title = call.title().to_string();
        // Capture the bound set once; a rebind mid-flight won't change it
        let transport = self.registry.current();
        self.op_task = Some(OpTask::spawn(transport, call, refresh));
        self.mode = Mode::Progress { title, frame: 0 };
    }

    pub fn show_menu(&mut self) {
        let on_entry = self.active_panel().current_name().is_some();
        let items = build_menu(on_entry, self.config.terminal.enabled);
        self.mode = Mode::Menu { items, selected: 0 };
    }

    pub fn run_menu_action(&mut self, action: MenuAction) {
        self.mode = Mode::Normal;
        match action {
            MenuAction::Copy => self.show(Operation::Copy, None),
            MenuAction::Move => self.show(Operation::Move, None),
            MenuAction::Delete => self.show(Operation::Delete, None),
            MenuAction::Pack => self.show(Operation::Pack, None),
            MenuAction::Extract => self.show(Operation::Extract, None),
            MenuAction::Refresh => self.refresh_panels(),
            MenuAction::ToggleSelectAll => self.active_panel_mut().select_all(),
            MenuAction::Terminal => self.open_terminal(),
            MenuAction::RunCommand => self.prompt_run_command(),
            MenuAction::Quit => self.should_quit = true,
        }
    }

    pub fn open_terminal(&mut self) {
        if !self.config.terminal.enabled {
            return;
        }
        self.mode = Mode::Terminal {
            command: None,
            auto_close: false,
        };
    }

    pub fn prompt_run_command(&mut self) {
        if !self.config.terminal.enabled {
            return;
        }
        self.mode = Mode::RunCommand {
            input: crate::input::InputLine::default(),
        };
    }

    /// Run one command in the terminal panel; the close notice keeps its
    /// output on screen until a key is pressed.
    pub fn run_in_terminal(&mut self, command: String) {
        if command.is_empty() {
            self.mode = Mode::Normal;
            return;
        }
        self.mode = Mode::Terminal {
            command: Some(command),
            auto_close: false,
        };
    }

    /// Panel context exported into the terminal's environment
    pub fn term_context(&self) -> TermContext {
        let active = self.active_panel();
        let current_name = active.current_name().unwrap_or_default().to_string();
        let current_path = if current_name.is_empty() {
            String::new()
        } else {
            join_remote(&active.path, &current_name)
        };
        TermContext {
            active_dir: active.path.clone(),
            passive_dir: self.inactive_panel().path.clone(),
            current_name,
            current_path,
        }
    }

    pub fn alert(&mut self, message: String) {
        self.mode = Mode::Alert {
            title: TITLE.to_string(),
            message,
        };
    }

    fn alert_no_files(&mut self) {
        self.alert("No files selected!".to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::{EntryKind, Listing, RemoteEntry};
    use crate::transport::test_support::RecordingTransport;
    use std::thread;

    fn entry(name: &str, kind: EntryKind) -> RemoteEntry {
        RemoteEntry {
            name: name.to_string(),
            kind,
            size: 0,
            modified: None,
        }
    }

    fn listing(path: &str, names: &[&str]) -> Listing {
        Listing {
            path: path.to_string(),
            files: names.iter().map(|n| entry(n, EntryKind::File)).collect(),
        }
    }

    fn test_app() -> App {
        let mut config = Config::default();
        // No operator link in unit tests; transports are stubbed instead
        config.operator.enabled = false;
        App::new(config).unwrap()
    }

    fn loaded_app() -> App {
        let mut app = test_app();
        app.left_panel.apply_listing(listing("/left", &["a.txt", "b.txt", "c.txt"]));
        app.right_panel.apply_listing(listing("/right", &["b.txt"]));
        app
    }

    /// Swap in a recording transport and return the recorder
    fn record_transport(app: &App) -> Arc<RecordingTransport> {
        let recorder = Arc::new(RecordingTransport::new("test"));
        assert!(app.registry.bind(1, recorder.clone()));
        recorder
    }

    fn wait_for_operation(app: &mut App) {
        for _ in 0..100 {
            app.poll();
            if app.op_task.is_none() {
                return;
            }
            thread::sleep(Duration::from_millis(10));
        }
        panic!("operation did not complete");
    }

    #[test]
    fn test_show_is_noop_until_loaded() {
        let mut app = test_app();
        app.show(Operation::Copy, None);
        assert!(matches!(app.mode, Mode::Normal));
        assert!(app.op_task.is_none());
    }

    #[test]
    fn test_copy_opens_destination_prompt() {
        let mut app = loaded_app();
        app.left_panel.cursor = 1; // "a.txt", entry 0 is the parent
        app.show(Operation::Copy, None);
        match &app.mode {
            Mode::Transfer {
                kind,
                from,
                dest_input,
                ..
            } => {
                assert_eq!(*kind, TransferKind::Copy);
                assert_eq!(from, "/left");
                assert_eq!(dest_input.text, "/right");
            }
            other => panic!("unexpected mode: {:?}", other),
        }
    }

    #[test]
    fn test_copy_with_no_files_alerts() {
        let mut app = test_app();
        app.left_panel.apply_listing(listing("/left", &[]));
        app.right_panel.apply_listing(listing("/right", &[]));
        app.left_panel.cursor = 0; // parent entry
        app.show(Operation::Copy, None);
        assert!(matches!(app.mode, Mode::Alert { .. }));
    }

    #[test]
    fn test_submit_transfer_asks_before_overwrite() {
        let mut app = loaded_app();
        app.submit_transfer(
            TransferKind::Copy,
            "/left".to_string(),
            vec!["b.txt".to_string()],
            "/right".to_string(),
        );
        match &app.mode {
            Mode::OverwriteConfirm { name, .. } => assert_eq!(name, "b.txt"),
            other => panic!("unexpected mode: {:?}", other),
        }
    }

    #[test]
    fn test_submit_transfer_runs_without_collision() {
        let mut app = loaded_app();
        let recorder = record_transport(&app);
        app.submit_transfer(
            TransferKind::Move,
            "/left".to_string(),
            vec!["a.txt".to_string()],
            "/right".to_string(),
        );
        assert!(matches!(app.mode, Mode::Progress { .. }));
        wait_for_operation(&mut app);
        assert_eq!(recorder.calls.lock().unwrap().as_slice(), &["mv".to_string()]);
        assert!(matches!(app.mode, Mode::Normal));
    }

    #[test]
    fn test_submit_transfer_collision_without_flag_runs() {
        let mut app = loaded_app();
        app.config.confirmations.copy = false;
        let recorder = record_transport(&app);
        app.submit_transfer(
            TransferKind::Copy,
            "/left".to_string(),
            vec!["b.txt".to_string()],
            "/right".to_string(),
        );
        wait_for_operation(&mut app);
        assert_eq!(
            recorder.calls.lock().unwrap().as_slice(),
            &["copy".to_string()]
        );
    }

    #[test]
    fn test_delete_silent_invokes_remove() {
        let mut app = loaded_app();
        let recorder = record_transport(&app);
        // Focus b.txt (entries: .., a, b, c)
        app.left_panel.cursor = 2;
        assert_eq!(app.active_panel().current_name(), Some("b.txt"));
        app.show(Operation::DeleteSilent, None);
        wait_for_operation(&mut app);
        assert_eq!(
            recorder.calls.lock().unwrap().as_slice(),
            &["remove".to_string()]
        );
        // Delete refreshes only the active panel with the focus fallback
        assert!(app.left_panel.loading);
        assert!(!app.right_panel.loading);
    }

    #[test]
    fn test_pack_uses_configured_format() {
        let mut app = loaded_app();
        app.packer = PackFormat::Zip;
        let recorder = record_transport(&app);
        app.left_panel.cursor = 1; // a.txt
        app.show(Operation::Pack, None);
        wait_for_operation(&mut app);
        assert_eq!(
            recorder.calls.lock().unwrap().as_slice(),
            &["pack_zip".to_string()]
        );
    }

    #[test]
    fn test_run_command_prompt_flow() {
        let mut app = loaded_app();
        app.prompt_run_command();
        assert!(matches!(app.mode, Mode::RunCommand { .. }));
        app.run_in_terminal("ls -la".to_string());
        assert!(matches!(
            app.mode,
            Mode::Terminal {
                command: Some(_),
                auto_close: false
            }
        ));
    }

    #[test]
    fn test_menu_quit() {
        let mut app = loaded_app();
        app.run_menu_action(MenuAction::Quit);
        assert!(app.should_quit);
    }

    #[test]
    fn test_term_context() {
        let mut app = loaded_app();
        app.left_panel.cursor = 1; // a.txt
        let ctx = app.term_context();
        assert_eq!(ctx.active_dir, "/left");
        assert_eq!(ctx.passive_dir, "/right");
        assert_eq!(ctx.current_name, "a.txt");
        assert_eq!(ctx.current_path, "/left/a.txt");
    }
}
