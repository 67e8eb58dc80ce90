mod common;

use std::time::Duration;

use common::*;
use qsar_batch::error::{AppError, ConfigError, Stage, WorkflowError};
use qsar_batch::infrastructure::{Action, Script, ScriptedDriver};
use qsar_batch::workflow::Completion;
use qsar_batch::{Config, Item, ItemCtx};
use tokio_test::{assert_err, assert_ok};

fn ctx(item: &str) -> ItemCtx {
    ItemCtx::new(1, 1, Item::new(item))
}

fn assert_virtual_elapsed(started: tokio::time::Instant, secs: u64) {
    let elapsed = started.elapsed();
    assert!(
        elapsed >= Duration::from_secs(secs) && elapsed < Duration::from_secs(secs + 1),
        "elapsed {elapsed:?}"
    );
}

fn clicks(journal: &[Action], selector: &str) -> usize {
    journal
        .iter()
        .filter(|a| matches!(a, Action::Click(s) if s == selector))
        .count()
}

#[tokio::test(start_paused = true)]
async fn test_happy_path_drives_every_step_in_order() {
    let fixture = Fixture::new(&["Skin Irritation", "Ames Mutagenicity"]);
    let driver = ScriptedDriver::new([Script::new()
        .text(STATUS, "Processing...")
        .text(STATUS, "processing")
        .text(STATUS, "Finished")
        .text(TABLE, &panel("Skin Irritation\n0.9\nPositive"))]);

    let started = tokio::time::Instant::now();
    let outcome = assert_ok!(fixture.flow().run(&driver, &ctx("CCO")).await);

    assert_eq!(
        outcome.completion,
        Completion::Completed {
            elapsed: Duration::from_secs(10)
        }
    );
    assert_eq!(outcome.submit_attempts, 1);
    assert_eq!(outcome.panel.lines().len(), 8);
    // 固定等待 5 秒 + 两次轮询间隔
    assert_virtual_elapsed(started, 15);

    let status = || Action::Read(STATUS.to_string());
    assert_eq!(
        driver.journal(),
        vec![
            Action::Open,
            Action::Navigate(TARGET_URL.to_string()),
            Action::Click(ACCEPT.to_string()),
            Action::Click(MODEL_TAB.to_string()),
            Action::Click("/model/skin".to_string()),
            Action::Click("/model/ames".to_string()),
            Action::Click(SMILES_TAB.to_string()),
            Action::Type(SMILES_BOX.to_string(), "CCO".to_string()),
            Action::Click(SMILES_GO.to_string()),
            Action::Click(PREDICT.to_string()),
            status(),
            status(),
            status(),
            Action::Click(END_OK.to_string()),
            Action::Read(TABLE.to_string()),
            Action::Close,
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_submit_click_is_retried_until_it_succeeds() {
    let fixture = Fixture::new(&["Skin Irritation"]);
    let driver = ScriptedDriver::new([Script::new()
        .fail_clicks(PREDICT, 3)
        .text(STATUS, "done")
        .text(TABLE, "")]);

    let started = tokio::time::Instant::now();
    let outcome = assert_ok!(fixture.flow().run(&driver, &ctx("CCO")).await);

    assert_eq!(outcome.submit_attempts, 4);
    assert_eq!(clicks(&driver.journal(), PREDICT), 4);
    // 固定等待 5 秒 + 三次重试间隔
    assert_virtual_elapsed(started, 20);
}

#[tokio::test(start_paused = true)]
async fn test_capped_retry_fails_terminally_and_closes_session() {
    let config = Config {
        submit_max_attempts: Some(2),
        ..base_config()
    };
    let fixture = Fixture::with_config(&["Skin Irritation"], config);
    let driver = ScriptedDriver::new([Script::new()
        .fail_clicks(PREDICT, 5)
        .text(STATUS, "done")
        .text(TABLE, "")]);

    let err = assert_err!(fixture.flow().run(&driver, &ctx("CCO")).await);

    assert!(matches!(
        err,
        AppError::Workflow(WorkflowError::SubmitRetriesExhausted { attempts: 2, .. })
    ));
    let journal = driver.journal();
    assert_eq!(clicks(&journal, PREDICT), 2);
    assert_eq!(journal.last(), Some(&Action::Close));
    assert!(!journal.contains(&Action::Read(STATUS.to_string())));
}

#[tokio::test(start_paused = true)]
async fn test_poll_timeout_stops_at_first_interval_multiple_past_timeout() {
    let config = Config {
        timeout_secs: 12,
        poll_interval_secs: 5,
        enforce_timeout: true,
        ..base_config()
    };
    let fixture = Fixture::with_config(&["Skin Irritation"], config);
    let driver = ScriptedDriver::new([Script::new()
        .text(STATUS, "Processing")
        .text(TABLE, &panel("Skin Irritation\n0.4"))]);

    let outcome = assert_ok!(fixture.flow().run(&driver, &ctx("CCO")).await);

    assert_eq!(
        outcome.completion,
        Completion::TimedOut {
            elapsed: Duration::from_secs(15)
        }
    );
    let journal = driver.journal();
    assert_eq!(clicks(&journal, END_OK), 0);
    assert_eq!(
        journal
            .iter()
            .filter(|a| **a == Action::Read(STATUS.to_string()))
            .count(),
        3
    );
    assert!(journal.contains(&Action::Read(TABLE.to_string())));
    assert_eq!(journal.last(), Some(&Action::Close));
}

#[tokio::test(start_paused = true)]
async fn test_poll_timeout_on_exact_multiple() {
    let config = Config {
        timeout_secs: 10,
        poll_interval_secs: 5,
        enforce_timeout: true,
        ..base_config()
    };
    let fixture = Fixture::with_config(&["Skin Irritation"], config);
    let driver = ScriptedDriver::new([Script::new()
        .text(STATUS, "PROCESSING")
        .text(TABLE, "")]);

    let outcome = assert_ok!(fixture.flow().run(&driver, &ctx("CCO")).await);
    assert_eq!(
        outcome.completion,
        Completion::TimedOut {
            elapsed: Duration::from_secs(10)
        }
    );
}

#[tokio::test(start_paused = true)]
async fn test_without_enforcement_poll_waits_past_timeout() {
    let config = Config {
        timeout_secs: 10,
        enforce_timeout: false,
        ..base_config()
    };
    let fixture = Fixture::with_config(&["Skin Irritation"], config);
    let mut script = Script::new();
    for _ in 0..6 {
        script = script.text(STATUS, "processing");
    }
    let driver = ScriptedDriver::new([script.text(STATUS, "Completed").text(TABLE, "")]);

    let outcome = assert_ok!(fixture.flow().run(&driver, &ctx("CCO")).await);

    assert_eq!(
        outcome.completion,
        Completion::Completed {
            elapsed: Duration::from_secs(30)
        }
    );
    assert_eq!(clicks(&driver.journal(), END_OK), 1);
}

#[tokio::test(start_paused = true)]
async fn test_missing_terms_control_is_fatal_and_closes_session() {
    let fixture = Fixture::new(&["Skin Irritation"]);
    let driver = ScriptedDriver::new([Script::new().missing(ACCEPT)]);

    let err = assert_err!(fixture.flow().run(&driver, &ctx("CCO")).await);

    assert!(matches!(
        err,
        AppError::Workflow(WorkflowError::StepFailed {
            stage: Stage::AcceptingTerms,
            ..
        })
    ));
    let journal = driver.journal();
    assert_eq!(clicks(&journal, ACCEPT), 1);
    assert_eq!(clicks(&journal, PREDICT), 0);
    assert_eq!(journal.last(), Some(&Action::Close));
}

#[tokio::test(start_paused = true)]
async fn test_model_without_locator_raises_lookup_failure() {
    let fixture = Fixture::new(&["Skin Irritation", "Carcinogenicity"]);
    let driver = ScriptedDriver::new([Script::new()]);

    let err = assert_err!(fixture.flow().run(&driver, &ctx("CCO")).await);

    assert!(matches!(
        err,
        AppError::Config(ConfigError::UnknownModel { ref model }) if model == "Carcinogenicity"
    ));
    assert_eq!(driver.journal().last(), Some(&Action::Close));
}

#[tokio::test(start_paused = true)]
async fn test_missing_result_panel_fails_extraction() {
    let fixture = Fixture::new(&["Skin Irritation"]);
    let driver = ScriptedDriver::new([Script::new().text(STATUS, "done").missing(TABLE)]);

    let err = assert_err!(fixture.flow().run(&driver, &ctx("CCO")).await);

    assert!(matches!(
        err,
        AppError::Workflow(WorkflowError::StepFailed {
            stage: Stage::Extracting,
            ..
        })
    ));
    assert_eq!(driver.journal().last(), Some(&Action::Close));
}

#[tokio::test(start_paused = true)]
async fn test_session_open_failure_is_a_connect_failure() {
    let fixture = Fixture::new(&["Skin Irritation"]);
    let driver = ScriptedDriver::new(Vec::<Script>::new());

    let err = assert_err!(fixture.flow().run(&driver, &ctx("CCO")).await);

    assert!(matches!(
        err,
        AppError::Workflow(WorkflowError::StepFailed {
            stage: Stage::Connecting,
            ..
        })
    ));
    assert!(driver.journal().is_empty());
}
