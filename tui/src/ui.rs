//! Rendering.
//!
//! Layout:
//!   ┌─── header ──────────────────────────────────────────────────────────┐
//!   │  [1] Clinical Query  [2] Drug Interactions  [3] ...     backend     │
//!   ├─── sidebar ──┬─── page ─────────────────────────────────────────────┤
//!   │  pages       │  form                                                │
//!   │  history     ├──────────────────────────────────────────────────────┤
//!   │              │  results                                             │
//!   ├──────────────┴──────────────────────────────────────────────────────┤
//!   │  footer (key bindings, status)                                      │
//!   └─────────────────────────────────────────────────────────────────────┘

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use cds_contracts::{
    clinical::ClinicalResponse, guideline::DatabaseStats, levels::Severity,
    repository::RepositoryStats,
};
use cds_core::{
    interactions::SummaryOutcome,
    present::{self, Section, Tone},
    query_flow::QueryState,
    shell::Page,
};

use crate::app::{App, Field, GuidelineView, Mode, RepositoryView};

const SIDEBAR_WIDTH: f32 = 26.0;
const USER_MENU_HEIGHT: f32 = 7.0;
const TITLE_WIDTH: usize = 90;
const ABSTRACT_WIDTH: usize = 140;

pub fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Critical => Color::Magenta,
        Tone::Danger => Color::Red,
        Tone::Warning => Color::Yellow,
        Tone::Info => Color::Cyan,
        Tone::Success => Color::Green,
        Tone::Neutral => Color::Gray,
    }
}

fn bordered(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
}

fn label(text: &str) -> Span<'static> {
    Span::styled(format!("  {:<16}", text), Style::default().fg(Color::Gray))
}

fn dim(text: impl Into<String>) -> Line<'static> {
    Line::from(Span::styled(text.into(), Style::default().fg(Color::DarkGray)))
}

fn heading(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("  {}", text),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ))
}

fn error_line(text: &str) -> Line<'static> {
    Line::from(Span::styled(format!("  {}", text), Style::default().fg(Color::Red)))
}

// ── Frame ────────────────────────────────────────────────────────────────────

pub fn ui(f: &mut Frame, app: &App) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, outer[0], app);

    let sidebar_width = (SIDEBAR_WIDTH * app.shell.sidebar.openness()).round() as u16;
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(sidebar_width), Constraint::Min(20)])
        .split(outer[1]);

    if sidebar_width > 0 {
        render_sidebar(f, body[0], app);
    }
    match app.shell.active_page {
        Page::ClinicalQuery => render_query_page(f, body[1], app),
        Page::DrugInteractions => render_interactions_page(f, body[1], app),
        Page::Guidelines => render_guidelines_page(f, body[1], app),
        Page::KnowledgeRepository => render_repository_page(f, body[1], app),
    }
    render_footer(f, outer[2], app);

    if app.shell.user_menu.is_visible() {
        render_user_menu(f, outer[1], app);
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let title_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let mut spans = vec![Span::styled("Clinical Decision Support    ", title_style)];

    for page in Page::ALL {
        let style = if app.shell.active_page == page {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        spans.push(Span::styled(
            format!("[{}] {}  ", page.index() + 1, page.title()),
            style,
        ));
    }

    let (marker, color) = match &app.backend {
        None => ("● checking", Color::DarkGray),
        Some(Ok(h)) if h.is_healthy() => ("● online", Color::Green),
        Some(Ok(_)) => ("● degraded", Color::Yellow),
        Some(Err(_)) => ("● offline", Color::Red),
    };
    spans.push(Span::styled(marker, Style::default().fg(color)));

    f.render_widget(Paragraph::new(Line::from(spans)).block(bordered("")), area);
}

fn render_sidebar(f: &mut Frame, area: Rect, app: &App) {
    let mut items: Vec<ListItem> = Page::ALL
        .iter()
        .map(|page| {
            let style = if app.shell.active_page == *page {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            ListItem::new(Span::styled(format!(" {} {}", page.index() + 1, page.title()), style))
        })
        .collect();

    let history = app.query.history();
    if !history.is_empty() {
        items.push(ListItem::new(""));
        items.push(ListItem::new(dim(" Recent queries")));
        for entry in history.iter() {
            let width = area.width.saturating_sub(5) as usize;
            items.push(ListItem::new(format!("  {}", present::truncate(entry, width))));
        }
    }

    f.render_widget(List::new(items).block(bordered(" Pages ")), area);
}

fn render_user_menu(f: &mut Frame, body: Rect, app: &App) {
    let height = (USER_MENU_HEIGHT * app.shell.user_menu.openness()).round() as u16;
    let width = 52.min(body.width);
    let area = Rect {
        x: body.x + body.width.saturating_sub(width),
        y: body.y,
        width,
        height: height.min(body.height),
    };

    let backend = match &app.backend {
        None => "checking...".to_string(),
        Some(Ok(h)) => format!(
            "{} {}",
            h.status,
            h.version.as_deref().unwrap_or_default()
        ),
        Some(Err(e)) => e.user_message(),
    };
    let lines = vec![
        Line::from(vec![label("Backend"), Span::raw(app.base_url.clone())]),
        Line::from(vec![label("Status"), Span::raw(backend)]),
        Line::from(vec![label("Log file"), Span::raw(app.log_file.display().to_string())]),
        Line::from(vec![
            label("Bibliography"),
            Span::raw(app.repository.bibliography_format().to_string()),
        ]),
        dim("  [u] close"),
    ];

    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(lines)
            .block(bordered(" Session "))
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let key = |k: &str| Span::styled(format!("[{}] ", k), Style::default().fg(Color::Cyan));
    let mut spans = vec![Span::raw(" ")];

    if app.mode == Mode::Editing {
        spans.extend([key("Enter/Esc"), Span::raw("Done  "), key("Tab"), Span::raw("Next field  ")]);
    } else {
        spans.extend([
            key("1-4"),
            Span::raw("Page  "),
            key("Tab"),
            Span::raw("Field  "),
            key("Enter"),
            Span::raw("Edit  "),
            key("r"),
            Span::raw("Run  "),
        ]);
        let extra: &[(&str, &str)] = match app.shell.active_page {
            Page::ClinicalQuery => &[("t", "Type"), ("g", "Urgency"), ("h", "History"), ("c", "Clear")],
            Page::DrugInteractions => &[("a", "Add"), ("x", "Remove"), ("c", "Reset")],
            Page::Guidelines => &[("↑↓", "Select"), ("o", "Open"), ("p", "Specialty"), ("d", "Stats")],
            Page::KnowledgeRepository => &[
                ("Space", "Select"),
                ("o", "Open"),
                ("e", "Export"),
                ("b", "Format"),
                ("v/y/n", "Overview/Quality/Usage"),
            ],
        };
        for (k, text) in extra {
            spans.push(key(*k));
            spans.push(Span::raw(format!("{}  ", text)));
        }
        spans.extend([key("s"), Span::raw("Sidebar  "), key("q"), Span::raw("Quit")]);
    }

    if let Some((tone, text)) = &app.status {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(text.clone(), Style::default().fg(tone_color(*tone))));
    }

    f.render_widget(Paragraph::new(Line::from(spans)).block(bordered("")), area);
}

// ── Forms ────────────────────────────────────────────────────────────────────

fn field_line(app: &App, field: Field) -> Line<'static> {
    let focused = app.focused_field() == Some(field);
    let text = app.field_text(field).to_string();
    let marker = if focused { "▸" } else { " " };
    let value_style = if focused && app.mode == Mode::Editing {
        Style::default().fg(Color::White).add_modifier(Modifier::UNDERLINED)
    } else if focused {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let cursor = if focused && app.mode == Mode::Editing { "▏" } else { "" };
    Line::from(vec![
        Span::styled(marker, Style::default().fg(Color::Cyan)),
        Span::styled(format!(" {:<16}", field.label()), Style::default().fg(Color::Gray)),
        Span::styled(format!("{}{}", text, cursor), value_style),
    ])
}

fn split_form(area: Rect, form_height: u16) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(form_height), Constraint::Min(3)])
        .split(area);
    (chunks[0], chunks[1])
}

fn results_paragraph<'a>(lines: Vec<Line<'a>>, title: &'a str, scroll: u16) -> Paragraph<'a> {
    Paragraph::new(lines)
        .block(bordered(title))
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
}

// ── Clinical query ───────────────────────────────────────────────────────────

fn render_query_page(f: &mut Frame, area: Rect, app: &App) {
    let (form_area, results_area) = split_form(area, 10);

    let mut lines: Vec<Line> = app.fields().into_iter().map(|field| field_line(app, field)).collect();
    lines.push(Line::from(vec![
        label("Type / urgency"),
        Span::raw(format!(
            "{} / {}",
            app.query.form.query_type.label(),
            app.query.form.urgency.label()
        )),
    ]));
    if let Some(message) = app.context_error.as_deref().or(app.query.validation_message()) {
        lines.push(error_line(message));
    }
    f.render_widget(Paragraph::new(lines).block(bordered(" Clinical Question ")), form_area);

    let mut out: Vec<Line> = Vec::new();
    match app.query.state() {
        QueryState::Idle => out.push(dim("  Enter a question and press [r] to submit.")),
        QueryState::Submitting => out.push(dim("  Processing query...")),
        QueryState::Error(message) => out.push(error_line(&message)),
        QueryState::Success => {}
    }
    if let Some(response) = app.query.response() {
        out.extend(response_lines(response));
    }
    f.render_widget(results_paragraph(out, " Recommendations ", app.scroll), results_area);
}

fn response_lines(response: &ClinicalResponse) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let sections = present::sections(response);
    if sections.is_empty() {
        lines.push(dim("  No recommendations were returned for this query."));
    }

    for section in sections {
        lines.push(Line::from(""));
        lines.push(heading(section.title()));
        match section {
            Section::RedFlags => {
                for flag in &response.red_flags {
                    lines.push(Line::from(Span::styled(
                        format!("  ! {}", flag),
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )));
                }
            }
            Section::Recommendations => {
                for rec in &response.recommendations {
                    let evidence = tone_color(present::evidence_tone(&rec.evidence_level));
                    lines.push(Line::from(vec![
                        Span::raw(format!("  • {} ", rec.recommendation)),
                        Span::styled(
                            format!("[{}]", rec.evidence_level),
                            Style::default().fg(evidence),
                        ),
                        Span::styled(
                            format!(" {}", present::format_percent(rec.confidence_score)),
                            Style::default().fg(Color::DarkGray),
                        ),
                    ]));
                    if !rec.reasoning.is_empty() {
                        lines.push(dim(format!("      {}", rec.reasoning)));
                    }
                    for c in &rec.contraindications {
                        lines.push(Line::from(Span::styled(
                            format!("      ✗ {}", c),
                            Style::default().fg(Color::Yellow),
                        )));
                    }
                    for m in &rec.monitoring {
                        lines.push(dim(format!("      ◦ monitor {}", m)));
                    }
                }
            }
            Section::DrugInteractions => {
                for i in &response.drug_interactions {
                    lines.push(interaction_line(&i.severity, &i.drug1, &i.drug2));
                    lines.push(dim(format!("      {}", i.description)));
                }
            }
            Section::DifferentialDiagnoses => {
                for d in &response.differential_diagnoses {
                    lines.push(Line::from(format!("  • {}", d)));
                }
            }
            Section::NextSteps => {
                for (n, s) in response.next_steps.iter().enumerate() {
                    lines.push(Line::from(format!("  {}. {}", n + 1, s)));
                }
            }
        }
    }

    if let Some(note) = present::processing_note(response) {
        lines.push(Line::from(""));
        lines.push(dim(format!("  {}", note)));
    }
    lines
}

fn interaction_line(severity: &Severity, drug1: &str, drug2: &str) -> Line<'static> {
    let tone = present::severity_tone(severity);
    let mut badge = Style::default().fg(tone_color(tone));
    if tone == Tone::Critical {
        badge = badge.add_modifier(Modifier::BOLD);
    }
    Line::from(vec![
        Span::styled(format!("  [{}] ", present::severity_badge(severity)), badge),
        Span::raw(format!("{} + {}", drug1, drug2)),
    ])
}

// ── Drug interactions ────────────────────────────────────────────────────────

fn render_interactions_page(f: &mut Frame, area: Rect, app: &App) {
    let height = app.checker.medications.len() as u16 + 4;
    let (form_area, results_area) = split_form(area, height.min(area.height / 2));

    let mut lines: Vec<Line> = app.fields().into_iter().map(|field| field_line(app, field)).collect();
    if let Some(message) = app.checker.validation_message() {
        lines.push(error_line(message));
    }
    f.render_widget(Paragraph::new(lines).block(bordered(" Medications ")), form_area);

    let mut out: Vec<Line> = Vec::new();
    if app.checker.is_loading() {
        out.push(dim("  Checking interactions..."));
    }
    if let Some(message) = app.checker.error() {
        out.push(error_line(message));
    }
    if app.checker.shows_no_interactions() {
        out.push(Line::from(Span::styled(
            "  No interactions found between these medications.",
            Style::default().fg(Color::Green),
        )));
    }
    for i in app.checker.interactions() {
        out.push(interaction_line(&i.severity, &i.drug1, &i.drug2));
        out.push(Line::from(format!("      {}", i.description)));
        if let Some(mechanism) = &i.mechanism {
            out.push(dim(format!("      Mechanism: {}", mechanism)));
        }
        if !i.management.is_empty() {
            out.push(dim(format!("      Management: {}", i.management)));
        }
    }

    if let Some(report) = app.checker.report() {
        if !report.summaries.is_empty() {
            out.push(Line::from(""));
            out.push(heading("Drug profiles"));
        }
        for outcome in &report.summaries {
            out.push(match outcome {
                SummaryOutcome::Ok(s) => Line::from(vec![
                    label(&s.drug),
                    Span::raw(format!("{} known interactions", s.total_interactions)),
                ]),
                SummaryOutcome::Failed { drug, .. } => Line::from(vec![
                    label(drug),
                    Span::styled("profile unavailable", Style::default().fg(Color::Yellow)),
                ]),
            });
        }
    }

    if out.is_empty() {
        out.push(dim("  Enter at least two medications and press [r]."));
    }
    f.render_widget(results_paragraph(out, " Interactions ", app.scroll), results_area);
}

// ── Guidelines ───────────────────────────────────────────────────────────────

fn render_guidelines_page(f: &mut Frame, area: Rect, app: &App) {
    let (form_area, results_area) = split_form(area, 5);
    let explorer = &app.guidelines;

    let mut lines: Vec<Line> = app.fields().into_iter().map(|field| field_line(app, field)).collect();
    if let Some(message) = explorer.validation_message() {
        lines.push(error_line(message));
    }
    f.render_widget(Paragraph::new(lines).block(bordered(" Guideline Search ")), form_area);

    let detail = explorer.detail();
    if detail.is_loading() || detail.value().is_some() || detail.error().is_some() {
        let mut out = Vec::new();
        if detail.is_loading() {
            out.push(dim("  Loading guideline..."));
        }
        if let Some(message) = detail.error() {
            out.push(error_line(message));
        }
        if let Some(d) = detail.value() {
            let g = &d.guideline;
            out.push(heading(&g.title));
            out.push(Line::from(vec![
                label("Organization"),
                Span::raw(format!("{} ({})", g.organization, g.publication_year)),
            ]));
            out.push(Line::from(vec![
                label("Evidence"),
                Span::styled(
                    g.evidence_level.to_string(),
                    Style::default().fg(tone_color(present::evidence_tone(&g.evidence_level))),
                ),
            ]));
            out.push(Line::from(""));
            out.push(Line::from(format!("  {}", g.summary)));
            if !d.key_recommendations.is_empty() {
                out.push(Line::from(""));
                out.push(heading("Key recommendations"));
                for rec in &d.key_recommendations {
                    let grade = rec.class.as_deref().unwrap_or("-");
                    out.push(Line::from(format!("  • [{}] {}", grade, rec.recommendation)));
                }
            }
            for (title, items) in [
                ("Contraindications", &d.contraindications),
                ("Monitoring", &d.monitoring_requirements),
            ] {
                if !items.is_empty() {
                    out.push(Line::from(""));
                    out.push(heading(title));
                    out.extend(items.iter().map(|i| Line::from(format!("  • {}", i))));
                }
            }
        }
        out.push(dim("  [Esc] back to results"));
        f.render_widget(results_paragraph(out, " Guideline ", app.scroll), results_area);
        return;
    }

    let out = match app.guideline_view {
        GuidelineView::Stats => {
            let slot = explorer.stats();
            let mut out = Vec::new();
            if slot.is_loading() {
                out.push(dim("  Loading statistics..."));
            }
            if let Some(message) = slot.error() {
                out.push(error_line(message));
            }
            if let Some(stats) = slot.value() {
                out.extend(guideline_stats_lines(stats));
            }
            out
        }
        GuidelineView::Results => {
            let slot = explorer.results();
            let mut out = Vec::new();
            if slot.is_loading() {
                out.push(dim("  Searching..."));
            }
            if let Some(message) = slot.error() {
                out.push(error_line(message));
            }
            if explorer.shows_no_results() {
                out.push(dim("  No guidelines found."));
            }
            for (n, g) in slot.value().into_iter().flatten().enumerate() {
                let selected = n == app.guideline_cursor;
                let style = if selected {
                    Style::default().fg(Color::Black).bg(Color::Cyan)
                } else {
                    Style::default()
                };
                out.push(Line::from(vec![
                    Span::styled(format!(" {} ", present::truncate(&g.title, TITLE_WIDTH)), style),
                    Span::styled(
                        format!(" {} {} ", g.organization, g.publication_year),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::styled(
                        format!("[{}]", g.evidence_level),
                        Style::default().fg(tone_color(present::evidence_tone(&g.evidence_level))),
                    ),
                ]));
            }
            if out.is_empty() {
                out.push(dim("  Enter a search term or specialty and press [r]."));
            }
            out
        }
    };
    f.render_widget(results_paragraph(out, " Guidelines ", app.scroll), results_area);
}

fn guideline_stats_lines(stats: &DatabaseStats) -> Vec<Line<'static>> {
    let mut lines = vec![
        heading("Guideline database"),
        Line::from(vec![label("Guidelines"), Span::raw(stats.total_guidelines.to_string())]),
    ];
    if let (Some(oldest), Some(latest)) = (stats.oldest_year, stats.latest_year) {
        lines.push(Line::from(vec![label("Years"), Span::raw(format!("{}–{}", oldest, latest))]));
    }
    for (title, map) in [
        ("Specialties", &stats.specialties),
        ("Evidence levels", &stats.evidence_levels),
    ] {
        if map.is_empty() {
            continue;
        }
        lines.push(Line::from(""));
        lines.push(heading(title));
        lines.extend(map.iter().map(|(k, v)| Line::from(vec![label(k), Span::raw(v.to_string())])));
    }
    lines
}

// ── Knowledge repository ─────────────────────────────────────────────────────

fn render_repository_page(f: &mut Frame, area: Rect, app: &App) {
    let (form_area, results_area) = split_form(area, 8);
    let explorer = &app.repository;

    let mut lines: Vec<Line> = app.fields().into_iter().map(|field| field_line(app, field)).collect();
    lines.push(Line::from(vec![
        label("Selected"),
        Span::raw(format!(
            "{} document(s), format {}",
            explorer.selection.len(),
            explorer.bibliography_format()
        )),
    ]));
    if let Some(message) = explorer.validation_message() {
        lines.push(error_line(message));
    }
    f.render_widget(Paragraph::new(lines).block(bordered(" Repository Search ")), form_area);

    let detail = explorer.detail();
    if detail.is_loading() || detail.value().is_some() || detail.error().is_some() {
        let mut out = Vec::new();
        if detail.is_loading() {
            out.push(dim("  Loading document..."));
        }
        if let Some(message) = detail.error() {
            out.push(error_line(message));
        }
        if let Some(d) = detail.value() {
            out.push(heading(&d.title));
            out.push(Line::from(vec![
                label("Type"),
                Span::raw(format!("{} · {}", d.document_type, d.publication_status)),
            ]));
            out.push(Line::from(vec![
                label("Evidence"),
                Span::styled(
                    d.evidence_level.to_string(),
                    Style::default().fg(tone_color(present::evidence_tone(&d.evidence_level))),
                ),
            ]));
            if !d.keywords.is_empty() {
                out.push(Line::from(vec![label("Keywords"), Span::raw(d.keywords.join(", "))]));
            }
            out.push(Line::from(""));
            out.push(Line::from(format!("  {}", d.abstract_text)));
        }
        out.push(dim("  [Esc] back to results"));
        f.render_widget(results_paragraph(out, " Document ", app.scroll), results_area);
        return;
    }

    let (title, out) = match app.repository_view {
        RepositoryView::Results => (" Documents ", document_lines(app)),
        RepositoryView::Overview => {
            let slot = explorer.overview();
            (" Overview ", slot_lines(slot.is_loading(), slot.error(), slot.value().map(overview_lines)))
        }
        RepositoryView::Quality => {
            let slot = explorer.quality();
            let body = slot.value().map(|report| {
                let qa = &report.quality_assessment;
                let mut lines = vec![
                    heading("Repository quality"),
                    score_line("Overall", qa.overall_quality_score),
                    score_line("Evidence", qa.evidence_quality_score),
                ];
                if !report.summary.overall_grade.is_empty() {
                    lines.push(Line::from(vec![
                        label("Grade"),
                        Span::raw(report.summary.overall_grade.clone()),
                    ]));
                }
                for rec in &qa.recommendations {
                    lines.push(Line::from(format!("  • {}", rec)));
                }
                lines
            });
            (" Quality ", slot_lines(slot.is_loading(), slot.error(), body))
        }
        RepositoryView::Usage => {
            let slot = explorer.usage();
            let body = slot.value().map(|usage| {
                serde_json::to_string_pretty(usage)
                    .unwrap_or_default()
                    .lines()
                    .map(|l| Line::from(format!("  {}", l)))
                    .collect()
            });
            (" Usage ", slot_lines(slot.is_loading(), slot.error(), body))
        }
    };
    f.render_widget(results_paragraph(out, title, app.scroll), results_area);
}

fn slot_lines(
    loading: bool,
    error: Option<&str>,
    body: Option<Vec<Line<'static>>>,
) -> Vec<Line<'static>> {
    let mut out = Vec::new();
    if loading {
        out.push(dim("  Loading..."));
    }
    if let Some(message) = error {
        out.push(error_line(message));
    }
    out.extend(body.unwrap_or_default());
    out
}

fn score_line(name: &str, score: f64) -> Line<'static> {
    Line::from(vec![
        label(name),
        Span::styled(
            present::format_percent(score),
            Style::default().fg(tone_color(present::quality_tone(score))),
        ),
    ])
}

fn overview_lines(stats: &RepositoryStats) -> Vec<Line<'static>> {
    let mut lines = vec![
        heading("Knowledge repository"),
        Line::from(vec![label("Documents"), Span::raw(stats.total_documents.to_string())]),
    ];
    for (title, map) in [
        ("Document types", &stats.document_types),
        ("Evidence levels", &stats.evidence_levels),
    ] {
        if map.is_empty() {
            continue;
        }
        lines.push(Line::from(""));
        lines.push(heading(title));
        lines.extend(map.iter().map(|(k, v)| Line::from(vec![label(k), Span::raw(v.to_string())])));
    }
    for (metric, value) in &stats.quality_metrics {
        lines.push(score_line(metric, *value));
    }
    lines
}

fn document_lines(app: &App) -> Vec<Line<'static>> {
    let explorer = &app.repository;
    let slot = explorer.documents();
    let mut out = Vec::new();
    if slot.is_loading() {
        out.push(dim("  Searching..."));
    }
    if let Some(message) = slot.error() {
        out.push(error_line(message));
    }
    if explorer.export().is_loading() {
        out.push(dim("  Exporting bibliography..."));
    }
    if let Some(message) = explorer.export().error() {
        out.push(error_line(message));
    }

    let Some(docs) = slot.value() else {
        if out.is_empty() {
            out.push(dim("  Set filters and press [r] to search."));
        }
        return out;
    };
    if docs.is_empty() {
        out.push(dim("  No documents found."));
    }
    for (n, d) in docs.iter().enumerate() {
        let check = if explorer.selection.contains(&d.document_id) { "[x]" } else { "[ ]" };
        let style = if n == app.document_cursor {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default()
        };
        out.push(Line::from(vec![
            Span::raw(format!(" {} ", check)),
            Span::styled(present::truncate(&d.title, TITLE_WIDTH), style),
            Span::styled(
                format!(" [{}]", d.evidence_level),
                Style::default().fg(tone_color(present::evidence_tone(&d.evidence_level))),
            ),
            Span::styled(
                format!(" {}", present::format_percent(d.quality_score)),
                Style::default().fg(tone_color(present::quality_tone(d.quality_score))),
            ),
        ]));
        if !d.abstract_text.is_empty() {
            out.push(dim(format!(
                "      {}",
                present::truncate(&d.abstract_text, ABSTRACT_WIDTH)
            )));
        }
    }
    out
}
