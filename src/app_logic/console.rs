/*
 * Console implementation of the interactive shell operations. Prompts go to
 * stdout and answers are read line-by-line from stdin; `q` or end-of-input
 * dismisses a prompt, which the session maps to its cancelled outcome.
 *
 * Non-interactive runs (`--all`, `--output`) are supported by presetting the
 * answers, so scripted exports never block on a prompt.
 */
use crate::app_logic::messages::NoticeLevel;
use crate::app_logic::session::UiOperations;
use crate::core::models::{ResourceKind, UserDataProfile};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

pub struct ConsoleUi {
    pick_all: bool,
    preset_destination: Option<PathBuf>,
}

impl ConsoleUi {
    pub fn new(pick_all: bool, preset_destination: Option<PathBuf>) -> Self {
        ConsoleUi {
            pick_all,
            preset_destination,
        }
    }

    /// Reads one trimmed line from stdin. `None` on EOF or read failure,
    /// which callers treat as a dismissed prompt.
    fn read_line(prompt: &str) -> Option<String> {
        print!("{prompt}");
        io::stdout().flush().ok()?;
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim().to_string()),
            Err(e) => {
                log::warn!("ConsoleUi: stdin read failed: {e}");
                None
            }
        }
    }
}

impl UiOperations for ConsoleUi {
    fn pick_profiles(&self, catalog: &[UserDataProfile]) -> Option<Vec<UserDataProfile>> {
        if self.pick_all {
            return Some(catalog.to_vec());
        }

        println!("Profiles:");
        for (index, profile) in catalog.iter().enumerate() {
            let marker = if profile.is_default { " (default)" } else { "" };
            println!("  {}. {}{marker}", index + 1, profile.name);
        }

        loop {
            let answer =
                Self::read_line("Select profiles to export (e.g. 1,3; a = all, q = cancel): ")?;
            if answer.eq_ignore_ascii_case("q") {
                return None;
            }
            if answer.is_empty() || answer.eq_ignore_ascii_case("a") {
                return Some(catalog.to_vec());
            }

            let mut picked = Vec::new();
            let mut valid = true;
            for token in answer.split(',').map(str::trim).filter(|t| !t.is_empty()) {
                match token.parse::<usize>() {
                    Ok(number) if number >= 1 && number <= catalog.len() => {
                        picked.push(catalog[number - 1].clone());
                    }
                    _ => {
                        println!("Not a valid selection: {token}");
                        valid = false;
                        break;
                    }
                }
            }
            if valid && !picked.is_empty() {
                return Some(picked);
            }
        }
    }

    fn prompt_save_file(&self, default_file_name: &str) -> Option<PathBuf> {
        if let Some(destination) = &self.preset_destination {
            return Some(if destination.is_dir() {
                destination.join(default_file_name)
            } else {
                destination.clone()
            });
        }
        let answer = Self::read_line(&format!("Save archive as [{default_file_name}]: "))?;
        if answer.eq_ignore_ascii_case("q") {
            return None;
        }
        if answer.is_empty() {
            Some(PathBuf::from(default_file_name))
        } else {
            Some(PathBuf::from(answer))
        }
    }

    fn prompt_save_folder(&self) -> Option<PathBuf> {
        if let Some(destination) = &self.preset_destination {
            return Some(destination.clone());
        }
        let answer = Self::read_line("Destination folder [.]: ")?;
        if answer.eq_ignore_ascii_case("q") {
            return None;
        }
        if answer.is_empty() {
            Some(PathBuf::from("."))
        } else {
            Some(PathBuf::from(answer))
        }
    }

    fn open_resource(&self, kind: ResourceKind, target: &str) {
        // No editor to hand the resource to; print where it lives instead.
        match kind {
            ResourceKind::File => println!("Resource file: {target}"),
            ResourceKind::Extension => println!("Extension: {target}"),
        }
    }

    fn notify(&self, level: NoticeLevel, message: &str) {
        match level {
            NoticeLevel::Info => println!("{message}"),
            NoticeLevel::Warn => eprintln!("warning: {message}"),
            NoticeLevel::Error => eprintln!("error: {message}"),
        }
    }
}
