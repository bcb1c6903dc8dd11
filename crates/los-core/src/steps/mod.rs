//! The Little-Oven provisioning steps.
//!
//! Step numbers are positions in [`little_oven`] and are persisted in
//! `los.step` on deployed machines. Never reorder or remove an entry; retire
//! it with [`Retired`] instead and append new work at the end.

mod apt;
mod git;
mod password;
mod repo;
mod system;
mod tools;

use crate::action::{FnAction, Retired};
use crate::registry::StepRegistry;

pub use password::SetPassword;

pub fn little_oven() -> StepRegistry {
    let mut r = StepRegistry::new();
    r.push(FnAction::new("Ensure the operating system is up-to-date", system::update_os));
    r.push(FnAction::new("Install Git", system::install_git));
    r.push(FnAction::new("Install Python development", system::install_python_dev));
    r.push(FnAction::new("Ensure the operating system is up-to-date again", system::update_os));
    r.push(FnAction::new("Install pip", tools::install_pip));
    r.push(FnAction::new("Install the passphrase word list", system::install_wordlist));
    r.push(FnAction::new("Get the global configuration file", tools::fetch_global_config));
    r.push(SetPassword);
    r.push(FnAction::new("Change the hostname", system::change_hostname));
    r.push(FnAction::new("Change the timezone", system::change_timezone));
    r.push(FnAction::new("Change the keyboard layout", system::change_keyboard));
    r.push(FnAction::new("Change the locale", system::change_locale));
    r.push(FnAction::new("Configure Git", git::configure_git));
    r.push(Retired::new("Install PiFace Digital 2 packages"));
    r.push(Retired::new("Install python-dispatch package"));
    r.push(FnAction::new("Clone the Little Oven", repo::clone_little_oven));
    r.push(Retired::new("Install the PiFace initialization service"));
    r.push(FnAction::new("Stage rustup", tools::stage_rustup));
    r.push(FnAction::new("Install FUSE", system::install_fuse));
    r.push(FnAction::new("Stage VeraCrypt", tools::stage_veracrypt));
    r.push(FnAction::new(
        "Check for Rust and VeraCrypt after login",
        tools::install_login_check,
    ));
    r
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_has_twenty_one_steps() {
        let steps = little_oven();
        assert_eq!(steps.len(), 21);
        assert_eq!(steps.last_step(), 21);
    }

    #[test]
    fn retired_slots_keep_their_numbers() {
        let steps = little_oven();
        let retired: Vec<u32> = steps
            .iter()
            .filter(|(_, a)| a.is_retired())
            .map(|(n, _)| n)
            .collect();
        assert_eq!(retired, vec![14, 15, 17]);
    }

    #[test]
    fn descriptions_by_number() {
        let steps = little_oven();
        let desc = |n| steps.get(n).map(|a| a.description().to_string());
        assert_eq!(desc(1).as_deref(), Some("Ensure the operating system is up-to-date"));
        assert_eq!(desc(8).as_deref(), Some("Set the password"));
        assert_eq!(desc(9).as_deref(), Some("Change the hostname"));
        assert_eq!(desc(16).as_deref(), Some("Clone the Little Oven"));
        assert_eq!(
            desc(21).as_deref(),
            Some("Check for Rust and VeraCrypt after login")
        );
        assert!(desc(22).is_none());
    }

    mod catalogue_runs {
        use super::*;
        use crate::action::StepContext;
        use crate::config::Config;
        use crate::global_config::GlobalConfig;
        use crate::host::testing::RecordingHost;
        use crate::password::PasswordPolicy;
        use crate::sequencer::{Outcome, Sequencer, COMPLETION_MESSAGE, REBOOT_MESSAGE};
        use crate::service::SystemdService;
        use crate::step::StepCounter;
        use std::path::Path;
        use std::time::Duration;
        use tempfile::TempDir;

        fn run_from(step: u32, host: &RecordingHost) -> Outcome {
            run_from_with(step, host, &Config::default())
        }

        fn run_from_with(step: u32, host: &RecordingHost, config: &Config) -> Outcome {
            let dir = TempDir::new().unwrap();
            let step_file = dir.path().join("los.step");
            std::fs::write(&step_file, step.to_string()).unwrap();
            let mut counter = StepCounter::detached(step_file);
            let mut global = GlobalConfig::load(host, "/work/los.json").unwrap();
            let mut ctx = StepContext {
                host,
                config,
                global: &mut global,
                root: Path::new("/work"),
            };
            let registry = little_oven();
            let trigger = SystemdService::new(config.service.clone());
            Sequencer::new(&registry, &trigger)
                .reboot_delay(Duration::ZERO)
                .run(&mut counter, &mut ctx)
                .unwrap()
        }

        #[test]
        fn first_boot_stops_after_update() {
            let host = RecordingHost::new();
            let outcome = run_from(1, &host);
            assert_eq!(outcome, Outcome::Rebooting { executed: vec![1] });
            assert_eq!(
                host.broadcasts(),
                vec![
                    "Step #1: Ensure the operating system is up-to-date",
                    "Update the APT package list.",
                    "Upgrade APT packages.",
                    REBOOT_MESSAGE,
                ]
            );
        }

        #[test]
        fn second_boot_runs_through_to_the_next_update() {
            let host = RecordingHost::new();
            let outcome = run_from(2, &host);
            assert_eq!(outcome.executed(), &[2, 3, 4]);
            assert!(host.commands().contains(&"apt-get -y install git".to_string()));
            assert_eq!(host.commands().last().map(String::as_str), Some("reboot"));
        }

        #[test]
        fn word_list_is_installed_before_the_password_is_set() {
            let host = RecordingHost::new();
            let config = Config {
                password: PasswordPolicy::Fixed {
                    value: "raspberry".into(),
                },
                ..Config::default()
            };
            host.http_status
                .borrow_mut()
                .insert(config.global_config_url(), 404);
            let outcome = run_from_with(5, &host, &config);
            assert_eq!(outcome.executed(), &[5, 6, 7, 8, 9]);

            let commands = host.commands();
            let position = |cmd: &str| commands.iter().position(|c| c == cmd);
            let install = position("apt-get -y install wamerican").unwrap();
            let chpasswd = position("chpasswd").unwrap();
            assert!(install < chpasswd);
            assert!(host
                .broadcasts()
                .contains(&"Step #6: Install the passphrase word list".to_string()));
        }

        #[test]
        fn tail_of_catalogue_completes_and_disables_service() {
            let host = RecordingHost::new();
            let outcome = run_from(10, &host);
            assert_eq!(
                outcome,
                Outcome::Complete {
                    executed: (10..=21).collect()
                }
            );
            let broadcasts = host.broadcasts();
            assert!(!broadcasts.iter().any(|b| b.contains("PiFace")));
            assert_eq!(broadcasts.last().map(String::as_str), Some(COMPLETION_MESSAGE));
            assert_eq!(
                host.commands().last().map(String::as_str),
                Some("systemctl disable los.service")
            );
        }
    }
}
