//! Shared fixtures: a journal with one of every role, an in-memory backend
//! and helpers to walk an article into the interesting states.

#![allow(dead_code)]

use chrono::{DateTime, Duration, NaiveDate, Utc};
use editorial_core::attention::AttentionEngine;
use editorial_core::config::{CoreConfig, JournalSettings};
use editorial_core::directory::InMemoryDirectory;
use editorial_core::models::{
    Account, AccountId, Actor, Article, ArticleId, ArticleWorkflow, JournalId, Role,
};
use editorial_core::notify::RecordingDispatcher;
use editorial_core::ops::AssignmentOps;
use editorial_core::reminders::ReminderSender;
use editorial_core::state_machine::{
    FixedVerifier, TransitionEvent, VerificationOutcome, WorkflowMachine,
};
use editorial_core::storage::{InMemoryRepository, Repository};
use std::sync::Arc;

/// Day zero of every scenario.
pub const BASE: &str = "2026-03-01";

/// An instant `days` after day zero, at 09:00 UTC.
pub fn at_day(days: i64) -> DateTime<Utc> {
    (date(0) + Duration::days(days))
        .and_hms_opt(9, 0, 0)
        .expect("valid time")
        .and_utc()
}

/// The calendar date `days` after day zero.
pub fn date(days: i64) -> NaiveDate {
    BASE.parse::<NaiveDate>().expect("valid base date") + Duration::days(days)
}

pub struct World {
    pub repo: Arc<InMemoryRepository>,
    pub directory: Arc<InMemoryDirectory>,
    pub journal: JournalSettings,
    pub journal_id: JournalId,
    pub author: AccountId,
    pub editor: AccountId,
    pub reviewer: AccountId,
    pub second_reviewer: AccountId,
    pub eo: AccountId,
    pub director: AccountId,
    pub typesetter: AccountId,
}

impl World {
    pub fn new() -> Self {
        let repo = Arc::new(InMemoryRepository::new());
        let directory = Arc::new(InMemoryDirectory::new());

        let author = add(&directory, "Ada Author", &[]);
        let editor = add(&directory, "Enzo Editor", &[Role::Editor]);
        let reviewer = add(&directory, "Rita Reviewer", &[]);
        let second_reviewer = add(&directory, "Remo Reviewer", &[]);
        let eo = add(&directory, "Olga Office", &[Role::Eo]);
        let director = add(&directory, "Dana Director", &[Role::Director]);
        let typesetter = add(&directory, "Tess Typesetter", &[Role::Typesetter]);
        directory.set_eo(eo);

        Self {
            repo,
            directory,
            journal: JournalSettings::new("Journal of Examples", "JOE"),
            journal_id: JournalId::new(),
            author,
            editor,
            reviewer,
            second_reviewer,
            eo,
            director,
            typesetter,
        }
    }

    pub async fn seed_article(&self) -> ArticleId {
        let id = ArticleId::new();
        let article = Article {
            id,
            journal_id: self.journal_id,
            title: "A Study of Studies".into(),
            section_name: "article".into(),
            authors: vec![self.author],
            corresponding_author: self.author,
        };
        let workflow = ArticleWorkflow::new(id, self.journal_id, at_day(0));
        self.repo
            .insert_article(article, workflow)
            .await
            .expect("seed article");
        id
    }

    pub fn machine(&self, outcome: VerificationOutcome) -> WorkflowMachine {
        WorkflowMachine::new(
            self.repo.clone(),
            self.directory.clone(),
            Arc::new(FixedVerifier(outcome)),
            self.journal.clone(),
        )
    }

    pub fn ops(&self) -> AssignmentOps {
        AssignmentOps::new(self.repo.clone(), self.directory.clone(), self.journal.clone())
    }

    pub fn attention(&self) -> AttentionEngine {
        AttentionEngine::new(
            self.repo.clone(),
            self.directory.clone(),
            CoreConfig::default(),
        )
    }

    pub fn sender(&self, dispatch: Arc<RecordingDispatcher>) -> ReminderSender {
        ReminderSender::new(self.repo.clone(), dispatch, CoreConfig::default())
    }

    /// Submit the article and route it straight to `editor` being in charge.
    pub async fn advance_to_editor_selected(&self, article: ArticleId) {
        let machine = self.machine(VerificationOutcome::EditorFound(self.editor));
        machine
            .apply_transition(
                article,
                &TransitionEvent::AuthorSubmitsPaper,
                Actor::User(self.author),
                at_day(0),
            )
            .await
            .expect("author submits");
        machine
            .apply_transition(
                article,
                &TransitionEvent::SystemProcessesSubmission,
                Actor::System,
                at_day(0),
            )
            .await
            .expect("system processes");
    }
}

fn add(directory: &InMemoryDirectory, name: &str, roles: &[Role]) -> AccountId {
    let id = AccountId::new();
    directory.add_account(
        Account {
            id,
            full_name: name.to_string(),
            email: format!("{}@example.org", name.to_lowercase().replace(' ', ".")),
        },
        roles.iter().copied(),
    );
    id
}
