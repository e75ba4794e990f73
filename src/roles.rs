//! Per-article role resolution.
//!
//! Journal-wide memberships live in the account directory; what a user *is*
//! with respect to one article also depends on assignment and authorship
//! rows, resolved here.

use crate::directory::AccountDirectory;
use crate::error::Result;
use crate::models::account::{AccountId, Role};
use crate::models::article::{Article, ArticleWorkflow};
use crate::storage::Repository;

pub struct RoleResolver<'a> {
    repo: &'a dyn Repository,
    directory: &'a dyn AccountDirectory,
}

impl<'a> RoleResolver<'a> {
    pub fn new(repo: &'a dyn Repository, directory: &'a dyn AccountDirectory) -> Self {
        Self { repo, directory }
    }

    /// The user's role with respect to this article, or None.
    ///
    /// Article-specific roles win over journal-wide ones: the editor in
    /// charge who also sits on the EO desk is reported as editor.
    pub async fn resolve(
        &self,
        article: &Article,
        workflow: &ArticleWorkflow,
        user: AccountId,
    ) -> Result<Option<Role>> {
        if self.is_article_editor(article, user).await? {
            return Ok(Some(Role::Editor));
        }
        if self.is_article_reviewer(article, workflow, user).await? {
            return Ok(Some(Role::Reviewer));
        }
        if article.corresponding_author == user {
            return Ok(Some(Role::Author));
        }
        if article.authors.contains(&user) {
            return Ok(Some(Role::Coauthor));
        }
        if self.directory.has_role(user, Role::Typesetter).await? {
            return Ok(Some(Role::Typesetter));
        }
        if self.directory.has_role(user, Role::Eo).await? {
            return Ok(Some(Role::Eo));
        }
        if self.directory.has_role(user, Role::Director).await? {
            return Ok(Some(Role::Director));
        }
        Ok(None)
    }

    /// The editor currently in charge of the article.
    pub async fn is_article_editor(&self, article: &Article, user: AccountId) -> Result<bool> {
        Ok(self
            .repo
            .active_editor_assignment(article.id)
            .await?
            .map(|a| a.editor == user)
            .unwrap_or(false))
    }

    /// A reviewer of the current round whose assignment was not declined.
    pub async fn is_article_reviewer(
        &self,
        article: &Article,
        workflow: &ArticleWorkflow,
        user: AccountId,
    ) -> Result<bool> {
        Ok(self
            .repo
            .review_assignments(article.id)
            .await?
            .iter()
            .any(|a| {
                a.reviewer == user
                    && a.review_round == workflow.current_review_round
                    && a.date_declined.is_none()
            }))
    }

    /// Staff oversight over the article: the EO member in charge, any EO
    /// member, or a director.
    pub async fn is_article_supervisor(
        &self,
        workflow: &ArticleWorkflow,
        user: AccountId,
    ) -> Result<bool> {
        if workflow.eo_in_charge == Some(user) {
            return Ok(true);
        }
        if self.directory.has_role(user, Role::Eo).await? {
            return Ok(true);
        }
        self.directory.has_role(user, Role::Director).await
    }
}
