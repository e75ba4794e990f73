//! Declarative reminder configuration.
//!
//! One [`ReminderSetting`] per code: message templates, who nudges whom,
//! the offset from the target's due date, and the clemency window. Journals
//! may shadow any default entry via
//! [`crate::config::JournalSettings::reminder_overrides`].

use crate::models::reminder::ReminderCode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which account a reminder setting points at, resolved against the
/// reminder's target at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartySelector {
    /// The editor on the target assignment (or in charge of the article).
    Editor,
    /// The reviewer on the target review assignment.
    Reviewer,
    /// The corresponding author of the target's article.
    Author,
    /// The journal's editorial-office account.
    Eo,
    /// The journal's director.
    Director,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderSetting {
    pub code: ReminderCode,
    pub subject: String,
    pub body: String,
    pub actor: PartySelector,
    pub recipient: PartySelector,
    /// Offset in days from the target's due date. May be negative for
    /// advance warnings.
    pub days_after: i64,
    pub clemency_days: i64,
}

impl ReminderSetting {
    fn new(
        code: ReminderCode,
        subject: &str,
        body: &str,
        actor: PartySelector,
        recipient: PartySelector,
        days_after: i64,
        clemency_days: i64,
    ) -> Self {
        Self {
            code,
            subject: subject.to_string(),
            body: body.to_string(),
            actor,
            recipient,
            days_after,
            clemency_days,
        }
    }
}

/// The stock reminder configuration shared by all journals.
pub fn default_settings() -> HashMap<ReminderCode, ReminderSetting> {
    use PartySelector::{Author, Director, Editor, Eo, Reviewer};
    use ReminderCode::*;

    let entries = [
        ReminderSetting::new(
            ReviewerShouldEvaluateAssignment1,
            "Reminder: invitation to review \"{{ article_title }}\"",
            "Dear {{ recipient_name }},\n\nplease accept or decline the invitation to review \
             \"{{ article_title }}\" for {{ journal_name }}.",
            Editor,
            Reviewer,
            0,
            0,
        ),
        ReminderSetting::new(
            ReviewerShouldEvaluateAssignment2,
            "Second reminder: invitation to review \"{{ article_title }}\"",
            "Dear {{ recipient_name }},\n\nwe have not yet received your answer to the \
             invitation to review \"{{ article_title }}\".",
            Editor,
            Reviewer,
            3,
            0,
        ),
        ReminderSetting::new(
            ReviewerShouldEvaluateAssignment3,
            "A reviewer has not answered the invitation for \"{{ article_title }}\"",
            "Dear {{ recipient_name }},\n\na reviewer of \"{{ article_title }}\" has not \
             answered the invitation. Please consider inviting someone else.",
            Eo,
            Editor,
            5,
            0,
        ),
        ReminderSetting::new(
            ReviewerShouldWriteReview1,
            "Reminder: review of \"{{ article_title }}\" due on {{ date_due }}",
            "Dear {{ recipient_name }},\n\nyour review of \"{{ article_title }}\" for \
             {{ journal_name }} was due on {{ date_due }}.",
            Eo,
            Reviewer,
            0,
            2,
        ),
        ReminderSetting::new(
            ReviewerShouldWriteReview2,
            "A review of \"{{ article_title }}\" is overdue",
            "Dear {{ recipient_name }},\n\na review of \"{{ article_title }}\" is overdue. \
             Please solicit the reviewer or invite someone else.",
            Eo,
            Editor,
            5,
            0,
        ),
        ReminderSetting::new(
            EditorShouldSelectReviewer1,
            "Reminder: select reviewers for \"{{ article_title }}\"",
            "Dear {{ recipient_name }},\n\nplease select reviewers for \
             \"{{ article_title }}\".",
            Eo,
            Editor,
            0,
            0,
        ),
        ReminderSetting::new(
            EditorShouldSelectReviewer2,
            "Second reminder: select reviewers for \"{{ article_title }}\"",
            "Dear {{ recipient_name }},\n\n\"{{ article_title }}\" still has no reviewers \
             assigned.",
            Eo,
            Editor,
            3,
            0,
        ),
        ReminderSetting::new(
            EditorShouldSelectReviewer3,
            "An editor is not selecting reviewers for \"{{ article_title }}\"",
            "Dear {{ recipient_name }},\n\nthe editor in charge of \"{{ article_title }}\" \
             has not selected any reviewer.",
            Eo,
            Director,
            5,
            0,
        ),
        ReminderSetting::new(
            EditorShouldMakeDecision1,
            "Reminder: decision due for \"{{ article_title }}\"",
            "Dear {{ recipient_name }},\n\nall reviews of \"{{ article_title }}\" are in. \
             Please write your decision.",
            Eo,
            Editor,
            0,
            0,
        ),
        ReminderSetting::new(
            EditorShouldMakeDecision2,
            "Second reminder: decision due for \"{{ article_title }}\"",
            "Dear {{ recipient_name }},\n\n\"{{ article_title }}\" is still waiting for \
             your decision.",
            Eo,
            Editor,
            3,
            0,
        ),
        ReminderSetting::new(
            EditorShouldMakeDecision3,
            "An editor is not writing the decision for \"{{ article_title }}\"",
            "Dear {{ recipient_name }},\n\nthe editor in charge of \"{{ article_title }}\" \
             has not written a decision.",
            Eo,
            Director,
            5,
            0,
        ),
        ReminderSetting::new(
            AuthorShouldSubmitMajorRevision1,
            "Your revision of \"{{ article_title }}\" is due on {{ date_due }}",
            "Dear {{ recipient_name }},\n\nthe major revision of \"{{ article_title }}\" is \
             due on {{ date_due }}.",
            Editor,
            Author,
            -7,
            0,
        ),
        ReminderSetting::new(
            AuthorShouldSubmitMajorRevision2,
            "Your revision of \"{{ article_title }}\" is late",
            "Dear {{ recipient_name }},\n\nthe major revision of \"{{ article_title }}\" \
             was due on {{ date_due }}.",
            Editor,
            Author,
            0,
            0,
        ),
        ReminderSetting::new(
            AuthorShouldSubmitMinorRevision1,
            "Your revision of \"{{ article_title }}\" is due on {{ date_due }}",
            "Dear {{ recipient_name }},\n\nthe minor revision of \"{{ article_title }}\" is \
             due on {{ date_due }}.",
            Editor,
            Author,
            -7,
            0,
        ),
        ReminderSetting::new(
            AuthorShouldSubmitMinorRevision2,
            "Your revision of \"{{ article_title }}\" is late",
            "Dear {{ recipient_name }},\n\nthe minor revision of \"{{ article_title }}\" \
             was due on {{ date_due }}.",
            Editor,
            Author,
            0,
            0,
        ),
        ReminderSetting::new(
            AuthorShouldSubmitTechnicalRevision1,
            "Please update the metadata of \"{{ article_title }}\"",
            "Dear {{ recipient_name }},\n\nthe requested metadata update of \
             \"{{ article_title }}\" is due on {{ date_due }}.",
            Editor,
            Author,
            0,
            0,
        ),
        ReminderSetting::new(
            AuthorShouldSubmitTechnicalRevision2,
            "The metadata update of \"{{ article_title }}\" is late",
            "Dear {{ recipient_name }},\n\nthe requested metadata update of \
             \"{{ article_title }}\" was due on {{ date_due }}.",
            Editor,
            Author,
            1,
            0,
        ),
        ReminderSetting::new(
            DirectorShouldAssignEditor1,
            "Reminder: assign an editor to \"{{ article_title }}\"",
            "Dear {{ recipient_name }},\n\n\"{{ article_title }}\" has no editor in charge. \
             Please assign one.",
            Eo,
            Director,
            0,
            0,
        ),
        ReminderSetting::new(
            DirectorShouldAssignEditor2,
            "Second reminder: assign an editor to \"{{ article_title }}\"",
            "Dear {{ recipient_name }},\n\n\"{{ article_title }}\" still has no editor in \
             charge.",
            Eo,
            Director,
            3,
            0,
        ),
    ];

    entries.into_iter().map(|s| (s.code, s)).collect()
}

/// The reminder codes created together when a situation starts being tracked.
pub mod groups {
    use crate::models::reminder::ReminderCode::{self, *};

    pub const REVIEWER_SHOULD_EVALUATE: [ReminderCode; 3] = [
        ReviewerShouldEvaluateAssignment1,
        ReviewerShouldEvaluateAssignment2,
        ReviewerShouldEvaluateAssignment3,
    ];

    pub const REVIEWER_SHOULD_WRITE_REVIEW: [ReminderCode; 2] =
        [ReviewerShouldWriteReview1, ReviewerShouldWriteReview2];

    pub const EDITOR_SHOULD_SELECT_REVIEWER: [ReminderCode; 3] = [
        EditorShouldSelectReviewer1,
        EditorShouldSelectReviewer2,
        EditorShouldSelectReviewer3,
    ];

    pub const EDITOR_SHOULD_MAKE_DECISION: [ReminderCode; 3] = [
        EditorShouldMakeDecision1,
        EditorShouldMakeDecision2,
        EditorShouldMakeDecision3,
    ];

    pub const AUTHOR_SHOULD_SUBMIT_MAJOR_REVISION: [ReminderCode; 2] = [
        AuthorShouldSubmitMajorRevision1,
        AuthorShouldSubmitMajorRevision2,
    ];

    pub const AUTHOR_SHOULD_SUBMIT_MINOR_REVISION: [ReminderCode; 2] = [
        AuthorShouldSubmitMinorRevision1,
        AuthorShouldSubmitMinorRevision2,
    ];

    pub const AUTHOR_SHOULD_SUBMIT_TECHNICAL_REVISION: [ReminderCode; 2] = [
        AuthorShouldSubmitTechnicalRevision1,
        AuthorShouldSubmitTechnicalRevision2,
    ];

    pub const DIRECTOR_SHOULD_ASSIGN_EDITOR: [ReminderCode; 2] =
        [DirectorShouldAssignEditor1, DirectorShouldAssignEditor2];
}
