//! Interactive calendar browser.
//!
//! Reads one command per line and redraws the month after each. Month
//! navigation inside the loaded year works from memory; crossing into
//! another year triggers a load of that year.

use std::io::Write;
use std::path::PathBuf;

use afisha_core::{CalendarView, Event, EventDraft, MonthCursor, generate_ics, ics_file_name};
use afisha_providers::{EventRepository, LoadOutcome};
use chrono::NaiveDate;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::actions;
use crate::cli::PeriodArgs;
use crate::error::ClientResult;

use super::export::write_ics;
use super::{Context, render_calendar, render_failure};

const PROMPT: &str = "[n/p] месяц  [1-31] день  [e N] подробнее  [x N] .ics  [? справка]  [q] выход";

const HELP: &str = "\
n, >      следующий месяц
p, <      предыдущий месяц
t         текущий месяц
1-31      выбрать день (повторно - снять выбор)
e N       развернуть событие N
x N       сохранить событие N в .ics
o N       открыть ссылку события N
a         шаблон описания (для администраторов)
r         повторить загрузку
R         сбросить и загрузить заново
q         выход";

/// One line of user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseCommand {
    Next,
    Prev,
    Today,
    Day(u32),
    Expand(usize),
    Export(usize),
    Open(usize),
    Draft,
    Retry,
    Reload,
    Help,
    Quit,
}

impl BrowseCommand {
    /// Parses a command line. Returns `None` for anything unrecognized.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let (verb, arg) = match line.split_once(char::is_whitespace) {
            Some((verb, arg)) => (verb, Some(arg.trim())),
            None => (line, None),
        };
        let index = || arg.and_then(|a| a.parse::<usize>().ok()).filter(|&n| n > 0);

        match (verb, arg) {
            ("n" | ">", None) => Some(Self::Next),
            ("p" | "<", None) => Some(Self::Prev),
            ("t", None) => Some(Self::Today),
            ("a", None) => Some(Self::Draft),
            ("r", None) => Some(Self::Retry),
            ("R", None) => Some(Self::Reload),
            ("?" | "h", None) => Some(Self::Help),
            ("q", None) => Some(Self::Quit),
            ("e", Some(_)) => index().map(Self::Expand),
            ("x", Some(_)) => index().map(Self::Export),
            ("o", Some(_)) => index().map(Self::Open),
            (day, None) => day.parse::<u32>().ok().filter(|&d| d > 0).map(Self::Day),
            _ => None,
        }
    }
}

/// What the loop should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Redraw, then print the message if any.
    Continue(Option<String>),
    Quit,
}

/// Browser state: the repository, the calendar view and the expanded event.
pub struct Browser<'a> {
    ctx: &'a Context,
    repo: EventRepository,
    view: CalendarView,
    expanded: Option<String>,
}

impl<'a> Browser<'a> {
    pub fn new(ctx: &'a Context, view: CalendarView) -> Self {
        Self {
            ctx,
            repo: ctx.repository(view.year()),
            view,
            expanded: None,
        }
    }

    pub fn view(&self) -> &CalendarView {
        &self.view
    }

    /// Loads the initial year.
    pub async fn start(&mut self) -> LoadOutcome {
        self.repo.load(self.view.year()).await
    }

    /// Applies one command.
    pub async fn apply(&mut self, command: BrowseCommand) -> Step {
        debug!(?command, "browse command");
        let message = match command {
            BrowseCommand::Quit => return Step::Quit,
            BrowseCommand::Next => {
                let changed = self.view.next_month();
                self.after_navigation(changed).await
            }
            BrowseCommand::Prev => {
                let changed = self.view.prev_month();
                self.after_navigation(changed).await
            }
            BrowseCommand::Today => {
                let changed = self.view.go_to(MonthCursor::containing(self.ctx.today));
                self.after_navigation(changed).await
            }
            BrowseCommand::Day(day) => {
                let cursor = self.view.cursor();
                match NaiveDate::from_ymd_opt(cursor.year(), cursor.month(), day) {
                    Some(date) => {
                        self.view.select_day(date);
                        self.expanded = None;
                        None
                    }
                    None => Some(format!("В этом месяце нет {day} числа")),
                }
            }
            BrowseCommand::Expand(n) => match self.visible_event(n).await {
                Some(event) => {
                    self.expanded = if self.expanded.as_deref() == Some(event.id.as_str()) {
                        None
                    } else {
                        Some(event.id)
                    };
                    None
                }
                None => Some(no_such_event(n)),
            },
            BrowseCommand::Export(n) => match self.visible_event(n).await {
                Some(event) => Some(match export_to_cwd(&event) {
                    Ok(path) => format!("Сохранено: {}", path.display()),
                    Err(e) => format!("Не удалось сохранить: {e}"),
                }),
                None => Some(no_such_event(n)),
            },
            BrowseCommand::Open(n) => match self.visible_event(n).await {
                Some(event) if event.has_link() => match actions::open_url(&event.link) {
                    Ok(()) => None,
                    Err(e) => Some(e.to_string()),
                },
                Some(_) => Some("У события нет ссылки".to_string()),
                None => Some(no_such_event(n)),
            },
            BrowseCommand::Draft => {
                if self.ctx.is_admin() {
                    Some(
                        EventDraft::for_selection(self.view.selected(), self.ctx.today)
                            .render_description(),
                    )
                } else {
                    Some("Доступно только администраторам".to_string())
                }
            }
            BrowseCommand::Retry => {
                self.repo.load(self.view.year()).await;
                None
            }
            BrowseCommand::Reload => {
                self.expanded = None;
                self.repo.reload().await;
                None
            }
            BrowseCommand::Help => Some(HELP.to_string()),
        };
        Step::Continue(message)
    }

    /// Renders the month grid and either the events or the error panel.
    pub async fn render(&self) -> String {
        let snapshot = self.repo.snapshot().await;
        match &snapshot.failure {
            Some(failure) => format!(
                "{}\n\n{}",
                self.ctx
                    .formatter
                    .month_grid(&self.view.grid(&[], self.ctx.today)),
                render_failure(failure)
            ),
            None => render_calendar(
                &self.ctx.formatter,
                &self.view,
                &snapshot.events,
                self.ctx.today,
                self.expanded.as_deref(),
            ),
        }
    }

    async fn after_navigation(&mut self, year_changed: bool) -> Option<String> {
        self.expanded = None;
        if year_changed && self.repo.view_year(self.view.year()).await {
            self.repo.load(self.view.year()).await;
        }
        None
    }

    /// The `n`-th (1-based) event of the current list.
    async fn visible_event(&self, n: usize) -> Option<Event> {
        let snapshot = self.repo.snapshot().await;
        self.view
            .visible_events(&snapshot.events)
            .get(n - 1)
            .map(|e| (*e).clone())
    }
}

fn no_such_event(n: usize) -> String {
    format!("Нет события с номером {n}")
}

fn export_to_cwd(event: &Event) -> ClientResult<PathBuf> {
    let ics = generate_ics(event)?;
    let path = PathBuf::from(ics_file_name(event));
    write_ics(&path, &ics)?;
    Ok(path)
}

/// Runs the browser on stdin and stdout.
pub async fn browse(ctx: &Context, period: &PeriodArgs) -> ClientResult<()> {
    let view = period.view(ctx.today)?;
    let input = BufReader::new(tokio::io::stdin());
    run(ctx, view, input, std::io::stdout()).await
}

/// Runs the browser loop until `q` or end of input.
pub async fn run<R, W>(ctx: &Context, view: CalendarView, input: R, mut out: W) -> ClientResult<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut browser = Browser::new(ctx, view);
    browser.start().await;
    writeln!(out, "{}\n\n{}", browser.render().await, PROMPT)?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let Some(command) = BrowseCommand::parse(&line) else {
            writeln!(out, "Неизвестная команда, ? для справки")?;
            continue;
        };

        match browser.apply(command).await {
            Step::Quit => break,
            Step::Continue(message) => {
                writeln!(out, "\n{}\n\n{}", browser.render().await, PROMPT)?;
                if let Some(message) = message {
                    writeln!(out, "{message}")?;
                }
            }
        }
        out.flush()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::Identity;
    use crate::commands::testing::context;

    fn march() -> CalendarView {
        CalendarView::new(MonthCursor::new(2025, 3).unwrap())
    }

    #[test]
    fn parse_commands() {
        assert_eq!(BrowseCommand::parse("n"), Some(BrowseCommand::Next));
        assert_eq!(BrowseCommand::parse(" < "), Some(BrowseCommand::Prev));
        assert_eq!(BrowseCommand::parse("15"), Some(BrowseCommand::Day(15)));
        assert_eq!(BrowseCommand::parse("e 2"), Some(BrowseCommand::Expand(2)));
        assert_eq!(BrowseCommand::parse("x  1"), Some(BrowseCommand::Export(1)));
        assert_eq!(BrowseCommand::parse("r"), Some(BrowseCommand::Retry));
        assert_eq!(BrowseCommand::parse("R"), Some(BrowseCommand::Reload));
        assert_eq!(BrowseCommand::parse("q"), Some(BrowseCommand::Quit));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(BrowseCommand::parse("0"), None);
        assert_eq!(BrowseCommand::parse("e"), None);
        assert_eq!(BrowseCommand::parse("e 0"), None);
        assert_eq!(BrowseCommand::parse("n 2"), None);
        assert_eq!(BrowseCommand::parse("hello"), None);
    }

    #[tokio::test]
    async fn select_and_toggle_day() {
        let ctx = context(false);
        let mut browser = Browser::new(&ctx, march());
        assert!(browser.start().await.is_loaded());

        browser.apply(BrowseCommand::Day(15)).await;
        let screen = browser.render().await;
        assert!(screen.contains("[15]"));
        assert!(screen.contains("События за 15 число"));
        assert!(screen.contains("Основная информация"));

        browser.apply(BrowseCommand::Day(15)).await;
        assert!(browser.view().selected().is_none());
        assert!(browser.render().await.contains("События: март"));
    }

    #[tokio::test]
    async fn crossing_year_loads_next_year() {
        let ctx = context(false);
        let view = CalendarView::new(MonthCursor::new(2025, 12).unwrap());
        let mut browser = Browser::new(&ctx, view);
        browser.start().await;
        assert!(!browser.render().await.contains("ЗИМНИЙ БАЛ"));

        browser.apply(BrowseCommand::Next).await;
        let screen = browser.render().await;
        assert!(screen.starts_with("Январь 2026"));
        assert!(screen.contains("ЗИМНИЙ БАЛ"));

        browser.apply(BrowseCommand::Prev).await;
        assert!(browser.render().await.contains("События: декабрь\nСобытий нет"));
    }

    #[tokio::test]
    async fn expand_toggles() {
        let ctx = context(false);
        let mut browser = Browser::new(&ctx, march());
        browser.start().await;

        browser.apply(BrowseCommand::Expand(2)).await;
        assert!(browser.render().await.contains("Площадка: Библиотека"));
        browser.apply(BrowseCommand::Expand(2)).await;
        assert!(!browser.render().await.contains("Площадка: Библиотека"));

        let step = browser.apply(BrowseCommand::Expand(9)).await;
        assert_eq!(step, Step::Continue(Some("Нет события с номером 9".into())));
    }

    #[tokio::test]
    async fn failure_shows_panel() {
        let ctx = context(true);
        let mut browser = Browser::new(&ctx, march());
        assert!(matches!(browser.start().await, LoadOutcome::Failed(_)));

        let screen = browser.render().await;
        assert!(screen.starts_with("Март 2025"));
        assert!(screen.contains("Ошибка Google API\nBackend Error (503)"));
        assert!(!screen.contains("События:"));

        browser.apply(BrowseCommand::Reload).await;
        assert!(browser.render().await.contains("[R] перезагрузить"));
    }

    #[tokio::test]
    async fn draft_requires_admin() {
        let mut ctx = context(false);
        {
            let mut browser = Browser::new(&ctx, march());
            let step = browser.apply(BrowseCommand::Draft).await;
            assert_eq!(
                step,
                Step::Continue(Some("Доступно только администраторам".into()))
            );
        }

        ctx.identity = Identity::new(None, Some("42".into()));
        let mut browser = Browser::new(&ctx, march());
        browser.apply(BrowseCommand::Day(20)).await;
        let Step::Continue(Some(text)) = browser.apply(BrowseCommand::Draft).await else {
            panic!("expected draft text");
        };
        assert!(text.contains("5. Дата проведения: 2025-03-20"));
    }

    #[tokio::test]
    async fn run_reads_commands_until_quit() {
        let ctx = context(false);
        let input: &[u8] = b"15\nbogus\nq\nn\n";
        let mut out = Vec::new();

        run(&ctx, march(), input, &mut out).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Март 2025"));
        assert!(text.contains("События за 15 число"));
        assert!(text.contains("Неизвестная команда"));
        assert!(!text.contains("Апрель 2025"));
    }
}
