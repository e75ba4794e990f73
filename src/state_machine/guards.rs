use crate::directory::AccountDirectory;
use crate::error::{CoreError, Result};
use crate::models::account::{Actor, Role};
use crate::models::article::{Article, ArticleWorkflow};
use crate::roles::RoleResolver;
use crate::storage::Repository;
use async_trait::async_trait;

/// Everything a guard may inspect when deciding whether the acting user is
/// allowed to attempt a transition.
pub struct GuardContext<'a> {
    pub article: &'a Article,
    pub workflow: &'a ArticleWorkflow,
    pub actor: Actor,
    pub repo: &'a dyn Repository,
    pub directory: &'a dyn AccountDirectory,
}

impl GuardContext<'_> {
    pub fn resolver(&self) -> RoleResolver<'_> {
        RoleResolver::new(self.repo, self.directory)
    }

    fn denied(&self, reason: &str) -> CoreError {
        let user = match self.actor {
            Actor::System => "system".to_string(),
            Actor::User(id) => id.to_string(),
        };
        CoreError::PermissionDenied {
            user,
            reason: reason.to_string(),
        }
    }
}

/// Trait for implementing transition permission guards
#[async_trait]
pub trait PermissionGuard: Send + Sync {
    /// Check whether the transition may be attempted
    async fn check(&self, ctx: &GuardContext<'_>) -> Result<()>;

    /// Get a description of this guard for logging
    fn description(&self) -> &'static str;
}

/// Only the corresponding author (or a co-author) may act
pub struct IsArticleAuthor;

#[async_trait]
impl PermissionGuard for IsArticleAuthor {
    async fn check(&self, ctx: &GuardContext<'_>) -> Result<()> {
        match ctx.actor.account() {
            Some(user) if ctx.article.is_author(user) => Ok(()),
            _ => Err(ctx.denied("only an author of the article may do this")),
        }
    }

    fn description(&self) -> &'static str {
        "Acting user must be an author of the article"
    }
}

/// Only the editor currently in charge may act
pub struct IsArticleEditor;

#[async_trait]
impl PermissionGuard for IsArticleEditor {
    async fn check(&self, ctx: &GuardContext<'_>) -> Result<()> {
        let Some(user) = ctx.actor.account() else {
            return Err(ctx.denied("only the editor in charge may do this"));
        };
        if ctx.resolver().is_article_editor(ctx.article, user).await? {
            Ok(())
        } else {
            Err(ctx.denied("only the editor in charge may do this"))
        }
    }

    fn description(&self) -> &'static str {
        "Acting user must be the editor in charge"
    }
}

/// The editor in charge or article supervision (EO in charge, EO, director)
pub struct IsArticleEditorOrSupervisor;

#[async_trait]
impl PermissionGuard for IsArticleEditorOrSupervisor {
    async fn check(&self, ctx: &GuardContext<'_>) -> Result<()> {
        let Some(user) = ctx.actor.account() else {
            return Err(ctx.denied("only the editor in charge or staff may do this"));
        };
        let resolver = ctx.resolver();
        if resolver.is_article_editor(ctx.article, user).await?
            || resolver.is_article_supervisor(ctx.workflow, user).await?
        {
            Ok(())
        } else {
            Err(ctx.denied("only the editor in charge or staff may do this"))
        }
    }

    fn description(&self) -> &'static str {
        "Acting user must be the editor in charge or article supervision"
    }
}

/// Article supervision: the EO member in charge, any EO member, or a director
pub struct IsArticleSupervisor;

#[async_trait]
impl PermissionGuard for IsArticleSupervisor {
    async fn check(&self, ctx: &GuardContext<'_>) -> Result<()> {
        let Some(user) = ctx.actor.account() else {
            return Err(ctx.denied("only staff may do this"));
        };
        if ctx
            .resolver()
            .is_article_supervisor(ctx.workflow, user)
            .await?
        {
            Ok(())
        } else {
            Err(ctx.denied("only staff may do this"))
        }
    }

    fn description(&self) -> &'static str {
        "Acting user must be article supervision"
    }
}

/// System-only transition, never raised on behalf of a user
pub struct IsSystem;

#[async_trait]
impl PermissionGuard for IsSystem {
    async fn check(&self, ctx: &GuardContext<'_>) -> Result<()> {
        if ctx.actor.is_system() {
            Ok(())
        } else {
            Err(ctx.denied("system-only transition"))
        }
    }

    fn description(&self) -> &'static str {
        "Transition is system-only"
    }
}

/// Any account holding the journal-wide typesetter role
pub struct HasTypesetterRole;

#[async_trait]
impl PermissionGuard for HasTypesetterRole {
    async fn check(&self, ctx: &GuardContext<'_>) -> Result<()> {
        let Some(user) = ctx.actor.account() else {
            return Err(ctx.denied("only a typesetter may do this"));
        };
        if ctx.directory.has_role(user, Role::Typesetter).await? {
            Ok(())
        } else {
            Err(ctx.denied("only a typesetter may do this"))
        }
    }

    fn description(&self) -> &'static str {
        "Acting user must hold the typesetter role"
    }
}

/// Production-readiness gate for moving to `ReadyForPublication`
pub struct CanBeSetRfp;

#[async_trait]
impl PermissionGuard for CanBeSetRfp {
    async fn check(&self, ctx: &GuardContext<'_>) -> Result<()> {
        if ctx.workflow.can_be_set_rfp() {
            Ok(())
        } else {
            Err(ctx.denied("production checks are not complete"))
        }
    }

    fn description(&self) -> &'static str {
        "Production-readiness flags must all be satisfied"
    }
}

/// Helper for machine code that only needs the boolean
pub async fn passes(guard: &dyn PermissionGuard, ctx: &GuardContext<'_>) -> Result<bool> {
    match guard.check(ctx).await {
        Ok(()) => Ok(true),
        Err(CoreError::PermissionDenied { .. }) => Ok(false),
        Err(other) => Err(other),
    }
}
