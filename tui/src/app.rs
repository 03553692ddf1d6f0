//! TUI application state: page state holders, key handling, and the
//! spawn/complete bridge between the event loop and the tokio runtime.

use std::{future::Future, path::PathBuf, sync::Arc};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::{runtime::Handle, sync::mpsc::UnboundedSender};
use tracing::{debug, info, warn};

use cds_config::ClientConfig;
use cds_contracts::{
    clinical::{ClinicalResponse, HealthStatus, QueryType, Urgency},
    error::CdsResult,
    guideline::{DatabaseStats, DetailedGuideline, Guideline},
    repository::{
        Bibliography, DocumentDetail, DocumentSummary, QualityReport, RepositoryStats,
        UsageAnalytics,
    },
};
use cds_core::{
    interactions::{run_check, CheckReport},
    present::Tone,
    shell::Page,
    traits::ClinicalApi,
    Completion, DrugInteractionChecker, GuidelineExplorer, QueryFlow, RepositoryExplorer, Shell,
    Ticket,
};

pub const BIBLIOGRAPHY_FORMATS: [&str; 3] = ["bibtex", "apa", "mla"];
const AGE_MESSAGE: &str = "Age must be a whole number";
const SCROLL_STEP: u16 = 5;

// ── Messages ─────────────────────────────────────────────────────────────────

/// A finished request, sent back from a runtime task to the event loop.
#[derive(Debug)]
pub enum Message {
    Health(CdsResult<HealthStatus>),
    Specialties(CdsResult<Vec<String>>),
    Query(Ticket, CdsResult<ClinicalResponse>),
    Check(Ticket, CdsResult<CheckReport>),
    Guidelines(Ticket, CdsResult<Vec<Guideline>>),
    GuidelineDetail(Ticket, CdsResult<DetailedGuideline>),
    GuidelineStats(Ticket, CdsResult<DatabaseStats>),
    Documents(Ticket, CdsResult<Vec<DocumentSummary>>),
    DocumentDetail(Ticket, CdsResult<DocumentDetail>),
    Overview(Ticket, CdsResult<RepositoryStats>),
    Quality(Ticket, CdsResult<QualityReport>),
    Usage(Ticket, CdsResult<UsageAnalytics>),
    Export(Ticket, CdsResult<Bibliography>),
}

// ── Input focus ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Editing,
}

/// An editable text box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Question,
    Age,
    Gender,
    Medications,
    Conditions,
    Allergies,
    Medication(usize),
    GuidelineQuery,
    GuidelineSpecialty,
    RepoQuery,
    RepoSpecialty,
    RepoDocumentType,
    RepoEvidenceLevel,
    RepoAccessLevel,
}

impl Field {
    pub fn label(self) -> String {
        match self {
            Field::Question => "Question".into(),
            Field::Age => "Age".into(),
            Field::Gender => "Gender".into(),
            Field::Medications => "Medications".into(),
            Field::Conditions => "Conditions".into(),
            Field::Allergies => "Allergies".into(),
            Field::Medication(i) => format!("Medication {}", i + 1),
            Field::GuidelineQuery | Field::RepoQuery => "Search".into(),
            Field::GuidelineSpecialty | Field::RepoSpecialty => "Specialty".into(),
            Field::RepoDocumentType => "Document type".into(),
            Field::RepoEvidenceLevel => "Evidence level".into(),
            Field::RepoAccessLevel => "Access level".into(),
        }
    }
}

/// Free-text patient context boxes on the query page. Lists are
/// comma-separated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextInputs {
    pub age: String,
    pub gender: String,
    pub medications: String,
    pub conditions: String,
    pub allergies: String,
}

/// What the lower pane of the guidelines page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuidelineView {
    Results,
    Stats,
}

/// What the lower pane of the repository page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryView {
    Results,
    Overview,
    Quality,
    Usage,
}

// ── App ──────────────────────────────────────────────────────────────────────

pub struct App {
    pub shell: Shell,
    pub mode: Mode,
    pub focus: usize,
    pub scroll: u16,
    pub should_quit: bool,
    /// Footer message and its tone.
    pub status: Option<(Tone, String)>,
    pub backend: Option<CdsResult<HealthStatus>>,
    pub base_url: String,
    pub log_file: PathBuf,
    pub export_dir: PathBuf,

    pub query: QueryFlow,
    pub context: ContextInputs,
    pub context_error: Option<String>,
    history_cursor: usize,

    pub checker: DrugInteractionChecker,

    pub guidelines: GuidelineExplorer,
    pub guideline_view: GuidelineView,
    pub guideline_cursor: usize,
    pub specialty_input: String,
    pub specialties: Vec<String>,

    pub repository: RepositoryExplorer,
    pub repository_view: RepositoryView,
    pub document_cursor: usize,

    api: Arc<dyn ClinicalApi>,
    runtime: Handle,
    tx: UnboundedSender<Message>,
}

impl App {
    pub fn new(
        config: &ClientConfig,
        api: Arc<dyn ClinicalApi>,
        runtime: Handle,
        tx: UnboundedSender<Message>,
    ) -> Self {
        Self {
            shell: Shell::new(),
            mode: Mode::Normal,
            focus: 0,
            scroll: 0,
            should_quit: false,
            status: None,
            backend: None,
            base_url: config.api.base_url.clone(),
            log_file: config.logging.tui_log_file.clone(),
            export_dir: PathBuf::from("."),
            query: QueryFlow::new(config.query.history_capacity),
            context: ContextInputs::default(),
            context_error: None,
            history_cursor: 0,
            checker: DrugInteractionChecker::new(),
            guidelines: GuidelineExplorer::new(config.guidelines.max_results),
            guideline_view: GuidelineView::Results,
            guideline_cursor: 0,
            specialty_input: String::new(),
            specialties: Vec::new(),
            repository: RepositoryExplorer::new(
                config.repository.max_results,
                config.repository.bibliography_format.clone(),
            ),
            repository_view: RepositoryView::Results,
            document_cursor: 0,
            api,
            runtime,
            tx,
        }
    }

    /// Fire the requests the shell needs up front.
    pub fn start(&mut self) {
        self.check_health();
        let api = Arc::clone(&self.api);
        self.spawn(async move { Message::Specialties(api.specialties().await) });
    }

    pub fn tick(&mut self) {
        self.shell.tick();
    }

    fn spawn<F>(&self, task: F)
    where
        F: Future<Output = Message> + Send + 'static,
    {
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            if tx.send(task.await).is_err() {
                debug!("event loop gone, dropping completion");
            }
        });
    }

    fn set_status(&mut self, tone: Tone, text: impl Into<String>) {
        self.status = Some((tone, text.into()));
    }

    // ── Fields ───────────────────────────────────────────────────────────────

    /// The text boxes of the active page, in focus order.
    pub fn fields(&self) -> Vec<Field> {
        match self.shell.active_page {
            Page::ClinicalQuery => vec![
                Field::Question,
                Field::Age,
                Field::Gender,
                Field::Medications,
                Field::Conditions,
                Field::Allergies,
            ],
            Page::DrugInteractions => (0..self.checker.medications.len())
                .map(Field::Medication)
                .collect(),
            Page::Guidelines => vec![Field::GuidelineQuery, Field::GuidelineSpecialty],
            Page::KnowledgeRepository => vec![
                Field::RepoQuery,
                Field::RepoSpecialty,
                Field::RepoDocumentType,
                Field::RepoEvidenceLevel,
                Field::RepoAccessLevel,
            ],
        }
    }

    pub fn focused_field(&self) -> Option<Field> {
        self.fields().get(self.focus).copied()
    }

    pub fn field_text(&self, field: Field) -> &str {
        match field {
            Field::Question => &self.query.form.query,
            Field::Age => &self.context.age,
            Field::Gender => &self.context.gender,
            Field::Medications => &self.context.medications,
            Field::Conditions => &self.context.conditions,
            Field::Allergies => &self.context.allergies,
            Field::Medication(i) => self.checker.medications.get(i).unwrap_or_default(),
            Field::GuidelineQuery => &self.guidelines.query,
            Field::GuidelineSpecialty => &self.specialty_input,
            Field::RepoQuery => &self.repository.filters.query,
            Field::RepoSpecialty => &self.repository.filters.specialty,
            Field::RepoDocumentType => &self.repository.filters.document_type,
            Field::RepoEvidenceLevel => &self.repository.filters.evidence_level,
            Field::RepoAccessLevel => &self.repository.filters.access_level,
        }
    }

    fn field_text_mut(&mut self, field: Field) -> Option<&mut String> {
        let text = match field {
            Field::Question => &mut self.query.form.query,
            Field::Age => &mut self.context.age,
            Field::Gender => &mut self.context.gender,
            Field::Medications => &mut self.context.medications,
            Field::Conditions => &mut self.context.conditions,
            Field::Allergies => &mut self.context.allergies,
            Field::Medication(i) => return self.checker.medications.get_mut(i),
            Field::GuidelineQuery => &mut self.guidelines.query,
            Field::GuidelineSpecialty => &mut self.specialty_input,
            Field::RepoQuery => &mut self.repository.filters.query,
            Field::RepoSpecialty => &mut self.repository.filters.specialty,
            Field::RepoDocumentType => &mut self.repository.filters.document_type,
            Field::RepoEvidenceLevel => &mut self.repository.filters.evidence_level,
            Field::RepoAccessLevel => &mut self.repository.filters.access_level,
        };
        Some(text)
    }

    fn move_focus(&mut self, forward: bool) {
        let count = self.fields().len();
        if count == 0 {
            return;
        }
        self.focus = if forward {
            (self.focus + 1) % count
        } else {
            (self.focus + count - 1) % count
        };
    }

    // ── Keys ─────────────────────────────────────────────────────────────────

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }
        match self.mode {
            Mode::Editing => self.handle_editing_key(key),
            Mode::Normal => self.handle_normal_key(key),
        }
    }

    fn handle_editing_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => self.mode = Mode::Normal,
            KeyCode::Tab => self.move_focus(true),
            KeyCode::BackTab => self.move_focus(false),
            KeyCode::Backspace => {
                if let Some(text) = self.focused_field().and_then(|f| self.field_text_mut(f)) {
                    text.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(text) = self.focused_field().and_then(|f| self.field_text_mut(f)) {
                    text.push(c);
                }
            }
            _ => {}
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Char(d @ '1'..='4') => {
                let index = d as usize - '1' as usize;
                if let Some(page) = Page::from_index(index) {
                    self.navigate(page);
                }
            }
            KeyCode::Char('s') => self.shell.toggle_sidebar(),
            KeyCode::Char('u') => {
                self.shell.toggle_user_menu();
                if self.shell.user_menu.is_visible() {
                    self.check_health();
                }
            }
            KeyCode::Tab => self.move_focus(true),
            KeyCode::BackTab => self.move_focus(false),
            KeyCode::Enter | KeyCode::Char('i') => {
                if self.focused_field().is_some() {
                    self.mode = Mode::Editing;
                }
            }
            KeyCode::Char('r') => self.run_page_action(),
            KeyCode::PageDown => self.scroll = self.scroll.saturating_add(SCROLL_STEP),
            KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(SCROLL_STEP),
            _ => match self.shell.active_page {
                Page::ClinicalQuery => self.handle_query_key(key.code),
                Page::DrugInteractions => self.handle_interactions_key(key.code),
                Page::Guidelines => self.handle_guidelines_key(key.code),
                Page::KnowledgeRepository => self.handle_repository_key(key.code),
            },
        }
    }

    fn handle_query_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('t') => {
                self.query.form.query_type = next_of(&QueryType::ALL, self.query.form.query_type)
            }
            KeyCode::Char('g') => {
                self.query.form.urgency = next_of(&Urgency::ALL, self.query.form.urgency)
            }
            KeyCode::Char('c') => self.clear_query_page(),
            KeyCode::Char('h') => {
                let len = self.query.history().len();
                if len > 0 {
                    self.query.recall(self.history_cursor % len);
                    self.history_cursor = (self.history_cursor + 1) % len;
                }
            }
            _ => {}
        }
    }

    fn handle_interactions_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('a') => {
                self.focus = self.checker.medications.add();
                self.mode = Mode::Editing;
            }
            KeyCode::Char('x') => {
                if self.checker.medications.remove(self.focus) {
                    self.focus = self.focus.min(self.checker.medications.len() - 1);
                }
            }
            KeyCode::Char('c') => {
                self.checker.reset();
                self.focus = 0;
            }
            _ => {}
        }
    }

    fn handle_guidelines_key(&mut self, code: KeyCode) {
        let count = self.guidelines.results().value().map_or(0, Vec::len);
        match code {
            KeyCode::Down => self.guideline_cursor = step(self.guideline_cursor, count, true),
            KeyCode::Up => self.guideline_cursor = step(self.guideline_cursor, count, false),
            KeyCode::Char('o') => self.open_guideline(),
            KeyCode::Char('d') => {
                self.guideline_view = GuidelineView::Stats;
                self.load_guideline_stats();
            }
            KeyCode::Char('p') => {
                if !self.specialties.is_empty() {
                    let next = self
                        .specialties
                        .iter()
                        .position(|s| *s == self.specialty_input)
                        .map_or(0, |i| (i + 1) % self.specialties.len());
                    self.specialty_input = self.specialties[next].clone();
                }
            }
            KeyCode::Esc => {
                self.guidelines.close_detail();
                self.guideline_view = GuidelineView::Results;
            }
            _ => {}
        }
    }

    fn handle_repository_key(&mut self, code: KeyCode) {
        let ids: Vec<String> = self
            .repository
            .documents()
            .value()
            .map(|docs| docs.iter().map(|d| d.document_id.clone()).collect())
            .unwrap_or_default();
        match code {
            KeyCode::Down => self.document_cursor = step(self.document_cursor, ids.len(), true),
            KeyCode::Up => self.document_cursor = step(self.document_cursor, ids.len(), false),
            KeyCode::Char(' ') => {
                if let Some(id) = ids.get(self.document_cursor) {
                    self.repository.selection.toggle(id);
                }
            }
            KeyCode::Char('a') => self.repository.select_all_results(),
            KeyCode::Char('c') => self.repository.selection.clear(),
            KeyCode::Char('o') => {
                if let Some(id) = ids.get(self.document_cursor) {
                    self.open_document(id.clone());
                }
            }
            KeyCode::Char('e') => self.export_selection(),
            KeyCode::Char('b') => {
                let format =
                    next_of(&BIBLIOGRAPHY_FORMATS, self.repository.bibliography_format()).to_string();
                self.repository.set_bibliography_format(format);
            }
            KeyCode::Char('v') => {
                self.repository_view = RepositoryView::Overview;
                self.load_overview();
            }
            KeyCode::Char('y') => {
                self.repository_view = RepositoryView::Quality;
                self.load_quality();
            }
            KeyCode::Char('n') => {
                self.repository_view = RepositoryView::Usage;
                self.load_usage();
            }
            KeyCode::Esc => {
                self.repository.close_detail();
                self.repository_view = RepositoryView::Results;
            }
            _ => {}
        }
    }

    // ── Navigation ───────────────────────────────────────────────────────────

    /// Switch pages, discarding the transient state of the page left behind.
    pub fn navigate(&mut self, page: Page) {
        let Some(leaving) = self.shell.navigate(page) else {
            return;
        };
        debug!(from = %leaving, to = %page, "navigate");
        match leaving {
            Page::ClinicalQuery => self.clear_query_page(),
            Page::DrugInteractions => self.checker.reset(),
            Page::Guidelines => {
                self.guidelines.reset();
                self.specialty_input.clear();
                self.guideline_view = GuidelineView::Results;
                self.guideline_cursor = 0;
            }
            Page::KnowledgeRepository => {
                self.repository.reset();
                self.repository_view = RepositoryView::Results;
                self.document_cursor = 0;
            }
        }
        self.mode = Mode::Normal;
        self.focus = 0;
        self.scroll = 0;
        self.status = None;
    }

    fn clear_query_page(&mut self) {
        self.query.clear_form();
        self.context = ContextInputs::default();
        self.context_error = None;
        self.history_cursor = 0;
    }

    // ── Requests ─────────────────────────────────────────────────────────────

    fn run_page_action(&mut self) {
        self.mode = Mode::Normal;
        match self.shell.active_page {
            Page::ClinicalQuery => self.submit_query(),
            Page::DrugInteractions => self.check_interactions(),
            Page::Guidelines => self.search_guidelines(),
            Page::KnowledgeRepository => self.search_documents(),
        }
    }

    fn check_health(&mut self) {
        let api = Arc::clone(&self.api);
        self.spawn(async move { Message::Health(api.health().await) });
    }

    fn submit_query(&mut self) {
        if let Err(message) = self.sync_patient_context() {
            self.context_error = Some(message);
            return;
        }
        self.context_error = None;
        let Ok(pending) = self.query.begin_submit() else {
            return;
        };
        self.scroll = 0;
        let api = Arc::clone(&self.api);
        self.spawn(async move {
            let result = api.submit_query(&pending.query).await;
            Message::Query(pending.ticket, result)
        });
    }

    /// Copy the free-text context boxes into the query form.
    fn sync_patient_context(&mut self) -> Result<(), String> {
        let age = match self.context.age.trim() {
            "" => None,
            text => Some(text.parse::<u32>().map_err(|_| AGE_MESSAGE.to_string())?),
        };
        let ctx = &mut self.query.form.patient_context;
        ctx.age = age;
        ctx.gender = Some(self.context.gender.trim())
            .filter(|g| !g.is_empty())
            .map(str::to_string);
        // Positional edit keeps each entry's index stable across re-syncs.
        let medications = split_list(&self.context.medications);
        for (index, name) in medications.iter().enumerate() {
            if !ctx.update_medication(index, name.as_str()) {
                ctx.add_medication(name.as_str());
            }
        }
        while ctx.remove_medication(medications.len()).is_some() {}
        ctx.medical_conditions = split_list(&self.context.conditions);
        ctx.allergies = split_list(&self.context.allergies);
        Ok(())
    }

    fn check_interactions(&mut self) {
        let Ok(pending) = self.checker.begin_check() else {
            return;
        };
        self.scroll = 0;
        let api = Arc::clone(&self.api);
        self.spawn(async move {
            let result = run_check(api.as_ref(), &pending.medications).await;
            Message::Check(pending.ticket, result)
        });
    }

    fn search_guidelines(&mut self) {
        let specialty = self.specialty_input.trim();
        self.guidelines.specialty = (!specialty.is_empty()).then(|| specialty.to_string());
        let Ok(pending) = self.guidelines.begin_search() else {
            return;
        };
        self.guideline_view = GuidelineView::Results;
        self.guideline_cursor = 0;
        self.scroll = 0;
        let api = Arc::clone(&self.api);
        self.spawn(async move {
            let result = pending.request.send(api.as_ref()).await;
            Message::Guidelines(pending.ticket, result)
        });
    }

    fn open_guideline(&mut self) {
        let Some(id) = self
            .guidelines
            .results()
            .value()
            .and_then(|r| r.get(self.guideline_cursor))
            .map(|g| g.id.clone())
        else {
            return;
        };
        let ticket = self.guidelines.begin_detail();
        self.scroll = 0;
        let api = Arc::clone(&self.api);
        self.spawn(async move { Message::GuidelineDetail(ticket, api.get_guideline(&id).await) });
    }

    fn load_guideline_stats(&mut self) {
        let ticket = self.guidelines.begin_stats();
        let api = Arc::clone(&self.api);
        self.spawn(async move {
            Message::GuidelineStats(ticket, api.guideline_database_stats().await)
        });
    }

    fn search_documents(&mut self) {
        let pending = self.repository.begin_search();
        self.repository_view = RepositoryView::Results;
        self.document_cursor = 0;
        self.scroll = 0;
        let api = Arc::clone(&self.api);
        self.spawn(async move {
            let result = api.search_documents(&pending.filters).await;
            Message::Documents(pending.ticket, result)
        });
    }

    fn open_document(&mut self, id: String) {
        let ticket = self.repository.begin_detail();
        self.scroll = 0;
        let api = Arc::clone(&self.api);
        self.spawn(async move { Message::DocumentDetail(ticket, api.get_document(&id).await) });
    }

    fn export_selection(&mut self) {
        let Ok(pending) = self.repository.begin_export() else {
            return;
        };
        let api = Arc::clone(&self.api);
        self.spawn(async move {
            let result = api
                .export_bibliography(&pending.document_ids, &pending.format)
                .await;
            Message::Export(pending.ticket, result)
        });
    }

    fn load_overview(&mut self) {
        let ticket = self.repository.begin_overview();
        let api = Arc::clone(&self.api);
        self.spawn(async move { Message::Overview(ticket, api.repository_overview().await) });
    }

    fn load_quality(&mut self) {
        let ticket = self.repository.begin_quality();
        let api = Arc::clone(&self.api);
        self.spawn(async move { Message::Quality(ticket, api.quality_report().await) });
    }

    fn load_usage(&mut self) {
        let ticket = self.repository.begin_usage();
        let api = Arc::clone(&self.api);
        self.spawn(async move { Message::Usage(ticket, api.usage_analytics().await) });
    }

    // ── Completions ──────────────────────────────────────────────────────────

    /// Hand a finished request to the state holder that issued it.
    pub fn apply(&mut self, message: Message) -> Completion {
        match message {
            Message::Health(result) => {
                if let Err(e) = &result {
                    warn!(error = %e, "health check failed");
                }
                self.backend = Some(result);
                Completion::Applied
            }
            Message::Specialties(result) => {
                match result {
                    Ok(list) => self.specialties = list,
                    Err(e) => warn!(error = %e, "could not load specialties"),
                }
                Completion::Applied
            }
            Message::Query(ticket, result) => self.query.complete(ticket, result),
            Message::Check(ticket, result) => {
                let completion = self.checker.complete(ticket, result);
                if completion.is_applied() && self.checker.report().is_some_and(|r| r.is_partial()) {
                    self.set_status(Tone::Warning, "Some drug profiles could not be loaded");
                }
                completion
            }
            Message::Guidelines(ticket, result) => self.guidelines.complete_search(ticket, result),
            Message::GuidelineDetail(ticket, result) => {
                self.guidelines.complete_detail(ticket, result)
            }
            Message::GuidelineStats(ticket, result) => self.guidelines.complete_stats(ticket, result),
            Message::Documents(ticket, result) => self.repository.complete_search(ticket, result),
            Message::DocumentDetail(ticket, result) => {
                self.repository.complete_detail(ticket, result)
            }
            Message::Overview(ticket, result) => self.repository.complete_overview(ticket, result),
            Message::Quality(ticket, result) => self.repository.complete_quality(ticket, result),
            Message::Usage(ticket, result) => self.repository.complete_usage(ticket, result),
            Message::Export(ticket, result) => {
                let text = result.as_ref().ok().map(Bibliography::to_text);
                let completion = self.repository.complete_export(ticket, result);
                if completion.is_applied() {
                    if let Some(text) = text {
                        self.save_bibliography(&text);
                    }
                }
                completion
            }
        }
    }

    /// File name for an export in the current format.
    pub fn export_path(&self) -> PathBuf {
        let ext = match self.repository.bibliography_format() {
            "bibtex" => "bib",
            _ => "txt",
        };
        self.export_dir.join(format!("bibliography.{}", ext))
    }

    fn save_bibliography(&mut self, text: &str) {
        let path = self.export_path();
        match std::fs::write(&path, text) {
            Ok(()) => {
                info!(path = %path.display(), "bibliography written");
                self.set_status(Tone::Success, format!("Saved {}", path.display()));
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not write bibliography");
                self.set_status(Tone::Danger, format!("Could not write {}", path.display()));
            }
        }
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────────

fn split_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// The element after `current` in `all`, wrapping. Unknown values map to the
/// first element.
fn next_of<T: Copy + PartialEq>(all: &[T], current: T) -> T {
    let next = all
        .iter()
        .position(|v| *v == current)
        .map_or(0, |i| (i + 1) % all.len());
    all[next]
}

fn step(cursor: usize, len: usize, down: bool) -> usize {
    match (len, down) {
        (0, _) => 0,
        (_, true) => (cursor + 1).min(len - 1),
        (_, false) => cursor.saturating_sub(1),
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
