use crate::chat::{Action, ChatEntry, ChatState};
use crate::dispatch::Dispatcher;
use crate::event::AppEvent;
use crate::markdown::{self, MarkdownBlock};
use crate::theme::Theme;
use eframe::egui::{self, RichText, ScrollArea};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::warn;

pub struct ChatApp {
    rx: Receiver<AppEvent>,
    dispatcher: Dispatcher,
    theme: Theme,
    state: ChatState,
    multi_agent_blocks: Vec<Vec<MarkdownBlock>>,
    diagnostics_log: Vec<String>,
}

impl ChatApp {
    pub fn new(rx: Receiver<AppEvent>, dispatcher: Dispatcher, theme: Theme) -> Self {
        Self {
            rx,
            dispatcher,
            theme,
            state: ChatState::default(),
            multi_agent_blocks: Vec::new(),
            diagnostics_log: Vec::new(),
        }
    }

    fn timestamp() -> String {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(duration) => duration.as_secs().to_string(),
            Err(_) => "0".to_string(),
        }
    }

    fn log_diagnostic(&mut self, message: impl Into<String>) {
        self.diagnostics_log
            .push(format!("[{}] {}", Self::timestamp(), message.into()));
    }

    fn ask_basic_llm(&mut self) {
        self.dispatcher.ask_basic_llm(self.state.input().to_string());
    }

    fn ask_multi_agent(&mut self) {
        if !self.state.multi_agent_enabled() {
            return;
        }
        self.state.reduce(Action::SetLoading(true));
        self.dispatcher
            .solve_with_agents(self.state.input().to_string());
    }

    fn drain_events(&mut self) {
        loop {
            match self.rx.try_recv() {
                Ok(event) => self.apply_event(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.log_diagnostic("event channel disconnected");
                    break;
                }
            }
        }
    }

    fn apply_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::BasicAnswered(entry) => {
                self.state.reduce(Action::AppendBasic(entry));
            }
            AppEvent::BasicFailed { query, error } => {
                self.log_diagnostic(format!("Basic LLM Error ({query:?}): {error}"));
            }
            AppEvent::MultiAgentSolved(entry) => {
                let source = markdown::response_markdown(entry.response.as_ref());
                self.multi_agent_blocks.push(markdown::parse_blocks(&source));
                self.state.reduce(Action::AppendMulti(entry));
            }
            AppEvent::MultiAgentFailed { query, error } => {
                self.log_diagnostic(format!("MultiAgent Error ({query:?}): {error}"));
            }
            AppEvent::MultiAgentSettled => {
                if !self.state.is_loading() {
                    warn!("multi-agent settled while not loading");
                }
                self.state.reduce(Action::SetLoading(false));
            }
        }
    }

    fn render_top_bar(&self, ctx: &egui::Context) {
        let client = self.dispatcher.client();
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.strong("Modus Chat");
                ui.separator();
                ui.label(RichText::new(client.base_url().as_str()).color(self.theme.text_muted));
                ui.separator();
                ui.label(
                    RichText::new(format!("body: {:?}", client.body_format()))
                        .color(self.theme.text_muted),
                );
            });
        });
    }

    fn render_diagnostics(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("diagnostics_panel").show(ctx, |ui| {
            egui::CollapsingHeader::new("Diagnostics")
                .default_open(false)
                .show(ui, |ui| {
                    ScrollArea::vertical()
                        .id_salt("diagnostics_log")
                        .max_height(120.0)
                        .stick_to_bottom(true)
                        .show(ui, |ui| {
                            if self.diagnostics_log.is_empty() {
                                ui.label(RichText::new("No errors").color(self.theme.text_muted));
                            }
                            for entry in &self.diagnostics_log {
                                ui.label(RichText::new(entry).color(self.theme.danger));
                            }
                        });
                });
        });
    }

    fn render_input_section(&mut self, ui: &mut egui::Ui) {
        let mut ask_basic = false;
        let mut ask_multi = false;

        self.theme.composer_frame().show(ui, |ui| {
            let mut draft = self.state.input().to_string();
            let response = ui.add(
                egui::TextEdit::singleline(&mut draft)
                    .desired_width(f32::INFINITY)
                    .hint_text("Enter your problem..."),
            );
            if response.changed() {
                self.state.reduce(Action::SetInput(draft));
            }

            ui.add_space(self.theme.spacing_8);
            ui.horizontal(|ui| {
                ask_basic = ui.button("Ask Basic LLM").clicked();
                ask_multi = ui
                    .add_enabled(
                        self.state.multi_agent_enabled(),
                        egui::Button::new(self.state.multi_agent_label()),
                    )
                    .clicked();
                if self.state.is_loading() {
                    ui.spinner();
                }
            });
        });

        if ask_basic {
            self.ask_basic_llm();
        }
        if ask_multi {
            self.ask_multi_agent();
        }
    }

    fn render_basic_column(&self, ui: &mut egui::Ui) {
        let theme = &self.theme;
        theme.column_frame().show(ui, |ui| {
            ui.heading(RichText::new("Basic LLM Responses").color(theme.basic_accent));
            ui.separator();
            ScrollArea::vertical()
                .id_salt("basic_chat")
                .auto_shrink([false, false])
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    for entry in self.state.basic().entries() {
                        theme.entry_frame().show(ui, |ui| {
                            ui.set_width(ui.available_width());
                            ui.label(RichText::new(format!("Q: {}", entry.query)).strong());
                            ui.label(format!("A: {}", entry.response_text()));
                        });
                        ui.add_space(theme.spacing_4);
                    }
                });
        });
    }

    fn render_multi_agent_column(&self, ui: &mut egui::Ui) {
        let theme = &self.theme;
        theme.column_frame().show(ui, |ui| {
            ui.heading(RichText::new("MultiAgent Solutions").color(theme.agent_accent));
            ui.separator();
            ScrollArea::vertical()
                .id_salt("multi_agent_chat")
                .auto_shrink([false, false])
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    let entries = self.state.multi_agent().entries();
                    for (entry, blocks) in entries.iter().zip(&self.multi_agent_blocks) {
                        self.render_multi_agent_entry(ui, entry, blocks);
                        ui.add_space(theme.spacing_4);
                    }
                });
        });
    }

    fn render_multi_agent_entry(&self, ui: &mut egui::Ui, entry: &ChatEntry, blocks: &[MarkdownBlock]) {
        self.theme.entry_frame().show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(RichText::new(format!("Problem: {}", entry.query)).strong());
            markdown::render_blocks(ui, &self.theme, blocks);
        });
    }

    fn render_center_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_input_section(ui);
            ui.add_space(self.theme.spacing_16);
            ui.columns(2, |columns| {
                self.render_basic_column(&mut columns[0]);
                self.render_multi_agent_column(&mut columns[1]);
            });
        });
    }

    #[cfg(test)]
    fn wait_for_event(&mut self, timeout: std::time::Duration) -> bool {
        match self.rx.recv_timeout(timeout) {
            Ok(event) => {
                self.apply_event(event);
                true
            }
            Err(_) => false,
        }
    }
}

impl eframe::App for ChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_events();
        self.render_top_bar(ctx);
        self.render_diagnostics(ctx);
        self.render_center_panel(ctx);
    }
}
