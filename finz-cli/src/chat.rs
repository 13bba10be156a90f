use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Terminal,
};
use std::io::{self, Stdout};
use std::path::PathBuf;

use chrono::{Duration, Utc};
use finz_chat::{MessageHandler, SessionRegistry};
use finz_core::{Interpreter, format_brl};
use finz_store::MemorySink;

use crate::config::Config;
use crate::state;

#[derive(Clone, Debug)]
struct Msg {
    role: Role,
    content: String,
}

#[derive(Clone, Debug)]
enum Role {
    User,
    Assistant,
}

struct ChatLog {
    path: PathBuf,
}

impl ChatLog {
    fn open_today() -> Result<Self> {
        let home = state::ensure_finz_home()?;
        let dir = home.join("chat");
        std::fs::create_dir_all(&dir)?;
        let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
        let path = dir.join(format!("{today}.md"));
        Ok(Self { path })
    }

    fn append_system(&mut self, msg: &str) -> Result<()> {
        self.append("system", msg)
    }

    fn append_user(&mut self, msg: &str) -> Result<()> {
        self.append("user", msg)
    }

    fn append_assistant(&mut self, msg: &str) -> Result<()> {
        self.append("assistant", msg)
    }

    fn append(&mut self, role: &str, msg: &str) -> Result<()> {
        use std::io::Write;
        let mut f = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(
            f,
            "- {} [{}] {}",
            chrono::Utc::now().to_rfc3339(),
            role,
            msg.replace('\n', " ")
        )?;
        Ok(())
    }
}

pub fn run_chat(cfg: &Config) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = chat_loop(&mut terminal, cfg);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    res
}

fn chat_loop(terminal: &mut Terminal<CrosstermBackend<Stdout>>, cfg: &Config) -> Result<()> {
    let handler = MessageHandler::new(Interpreter::with_defaults()?);
    let mut registry = SessionRegistry::new(
        cfg.chat.max_history_turns,
        Duration::minutes(cfg.chat.session_ttl_minutes),
    );
    let profile = state::read_profile()?;
    let mut ledger = state::load_ledger()?;
    let mut sink = MemorySink::new();

    let mut messages: Vec<Msg> = vec![Msg {
        role: Role::Assistant,
        content: "Olá! Registre uma transação, por exemplo: \"gastei 45,90 em comida\".".to_string(),
    }];

    let mut input = String::new();
    let mut show_help = true;

    // daily transcript file
    let mut log = ChatLog::open_today()?;
    log.append_system("session_start")?;

    loop {
        terminal.draw(|f| {
            let size = f.area();
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(5),
                    Constraint::Min(5),
                    Constraint::Length(3),
                ])
                .split(size);

            let splash = Paragraph::new(Text::from(vec![
                Line::from(Span::styled(
                    "FINZ",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::raw("")),
                Line::from(Span::styled(
                    ">_ finz chat",
                    Style::default().fg(Color::Cyan),
                )),
                Line::from(Span::styled(
                    "digite /ajuda para os comandos, Esc para sair",
                    Style::default().fg(Color::Gray),
                )),
            ]))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
            f.render_widget(splash, chunks[0]);

            let header = Block::default().borders(Borders::ALL).title("conversa");

            let mut lines: Vec<Line> = Vec::new();
            if show_help {
                lines.push(Line::from(Span::styled(
                    "Atalhos: Enter=enviar, Esc=sair, ?=ajuda",
                    Style::default().fg(Color::Gray),
                )));
                lines.push(Line::raw("Comandos: /ajuda /resumo /status /sair"));
                lines.push(Line::raw(""));
            }

            for m in &messages {
                let (tag, color) = match m.role {
                    Role::User => ("você", Color::Cyan),
                    Role::Assistant => ("finz", Color::Green),
                };
                lines.push(Line::from(vec![
                    Span::styled(format!("{}: ", tag), Style::default().fg(color)),
                    Span::raw(m.content.clone()),
                ]));
                lines.push(Line::raw(""));
            }

            let history = Paragraph::new(Text::from(lines))
                .block(header)
                .wrap(Wrap { trim: false });
            f.render_widget(history, chunks[1]);

            let input_block = Block::default().borders(Borders::ALL).title("mensagem");
            let input_widget = Paragraph::new(input.as_str())
                .block(input_block)
                .style(Style::default().fg(Color::White));
            f.render_widget(input_widget, chunks[2]);
        })?;

        if event::poll(std::time::Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Esc => break,
                    KeyCode::Enter => {
                        let trimmed = input.trim().to_string();
                        if !trimmed.is_empty() {
                            log.append_user(&trimmed)?;

                            if trimmed == "/sair" {
                                break;
                            }

                            messages.push(Msg {
                                role: Role::User,
                                content: trimmed.clone(),
                            });

                            let reply = if let Some(reply) = handle_slash(&trimmed, &ledger) {
                                reply
                            } else {
                                let session = registry.session_mut(state::LOCAL_OWNER, Utc::now());
                                let reply = handler.handle(
                                    session,
                                    &mut ledger,
                                    &mut sink,
                                    &trimmed,
                                    profile.today(),
                                );
                                state::save_ledger(&ledger)?;
                                reply
                            };

                            messages.push(Msg {
                                role: Role::Assistant,
                                content: reply.clone(),
                            });
                            log.append_assistant(&reply)?;
                        }
                        input.clear();
                    }
                    KeyCode::Char('?') if input.is_empty() => {
                        show_help = !show_help;
                    }
                    KeyCode::Backspace => {
                        input.pop();
                    }
                    KeyCode::Char(c) => {
                        input.push(c);
                    }
                    _ => {}
                }
            }
        }
    }

    log.append_system("session_end")?;
    Ok(())
}

fn handle_slash(input: &str, ledger: &finz_store::Ledger) -> Option<String> {
    let s = input.trim();
    if !s.starts_with('/') {
        return None;
    }
    match s {
        "/ajuda" => Some(
            "Comandos:\n\
- /ajuda\n\
- /resumo (totais e saldo)\n\
- /status (onde ficam os dados)\n\
- /sair\n\
\nAtalhos: Enter=enviar, Esc=sair, ?=ajuda"
                .to_string(),
        ),
        "/resumo" => {
            let stats = ledger.stats();
            Some(format!(
                "Resumo: {} transações\nReceitas: {}\nDespesas: {}\nSaldo: {}",
                stats.transaction_count,
                format_brl(stats.total_income),
                format_brl(stats.total_expense),
                format_brl(stats.balance),
            ))
        }
        "/status" => Some(
            "Status: transações em ~/.finz/ledger.json, conversas diárias em ~/.finz/chat/YYYY-MM-DD.md".to_string(),
        ),
        _ => Some("Comando desconhecido. Tente /ajuda".to_string()),
    }
}
