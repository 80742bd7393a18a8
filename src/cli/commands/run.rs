//! Run command - resolve a package tree and star (or check) its repositories

use super::report;
use crate::cache::{CachePolicy, CacheSet};
use crate::cli::args::Cli;
use crate::config::{resolve_token, Config, ConfigManager};
use crate::error::{StarsError, StarsResult};
use crate::github::{GithubClient, HostingApi};
use crate::package::{resolve_target, MetadataReader, PackageShow, PipShow};
use crate::registry::{PypiClient, RegistryApi};
use crate::resolve::{ResolutionResult, Resolver};
use crate::starred::{StarOptions, StarSummary, StarredSync};
use crate::ui::{self, ResolveProgress, TaskSpinner, UiContext};
use crate::walk::{DependencyWalker, DepthMap};
use tracing::{debug, info};

/// Execute a run; `walker` carries the already validated depth
pub fn execute(
    cli: &Cli,
    config: &Config,
    ctx: &UiContext,
    walker: DependencyWalker,
) -> StarsResult<()> {
    let token = resolve_token(cli.token.as_deref(), config)?;
    let package = resolve_target(&cli.target)?;
    debug!("target package: {}", package);

    let github = GithubClient::new(token, &config.github);
    let registry = PypiClient::new(&config.registry);
    let pip = PipShow::from_config(&config.package);

    let user = github.current_user()?;
    info!("GitHub user: {}", user);

    let cache_dir = config
        .cache
        .dir
        .clone()
        .unwrap_or_else(ConfigManager::default_cache_dir);
    let policy = CachePolicy::new(
        !cli.no_cache,
        config.cache.lifetime_days,
        config.cache.disabled_lifetime_secs,
    );
    let caches = CacheSet::open(&cache_dir, &user, &policy);

    let session = Session {
        caches: &caches,
        show: &pip,
        registry: &registry,
        hosting: &github,
        user: &user,
        max_starred_pages: config.github.max_starred_pages,
    };

    ui::intro(ctx, &format!("thank-you-stars: {}", package));
    let collected = session.collect(ctx, &walker, &package)?;

    if cli.check {
        return report::print(
            &collected.results,
            &collected.depths,
            cli.verbosity,
            cli.format,
        );
    }

    let options = StarOptions {
        include_owner_repo: cli.include_owner_repo,
        dry_run: cli.dry_run,
    };
    let summary = session.star(&collected.results, options)?;
    print_summary(ctx, &summary, options);

    Ok(())
}

/// Everything gathered for one target package
#[derive(Debug)]
pub struct Collected {
    pub depths: DepthMap,
    pub results: Vec<ResolutionResult>,
}

/// The collaborators of one run, bound to the acting user
pub struct Session<'a> {
    pub caches: &'a CacheSet,
    pub show: &'a dyn PackageShow,
    pub registry: &'a dyn RegistryApi,
    pub hosting: &'a dyn HostingApi,
    pub user: &'a str,
    pub max_starred_pages: u32,
}

impl Session<'_> {
    fn starred_sync(&self) -> StarredSync<'_> {
        StarredSync::new(self.caches, self.hosting, self.user, self.max_starred_pages)
    }

    /// Walk the dependency tree of `package` and resolve every package in it
    pub fn collect(
        &self,
        ctx: &UiContext,
        walker: &DependencyWalker,
        package: &str,
    ) -> StarsResult<Collected> {
        let starred = self.starred_sync().fetch()?;
        debug!("{} starred repositories", starred.len());

        let mut spinner = TaskSpinner::new(ctx);
        spinner.start("Collect package info");
        let reader = MetadataReader::new(self.caches.dependency(), self.show);
        let walked = walker.walk_with_progress(package, &reader, |depth| {
            spinner.message(&format!("Collect package info (depth {})", depth));
        });
        let depths = match walked {
            Ok(depths) => depths,
            Err(e) => {
                spinner.stop_error("Collect package info");
                return Err(e);
            }
        };
        spinner.stop(&format!("Collected {} package(s)", depths.len()));

        let resolver = Resolver::new(
            self.caches,
            self.show,
            self.registry,
            self.hosting,
            self.user,
            &starred,
        );

        let progress = ResolveProgress::new(ctx, "Collect GitHub info", depths.len() as u64);
        let mut results = Vec::with_capacity(depths.len());
        for name in depths.keys() {
            progress.start_item(name);
            let result = resolver.resolve(name);
            progress.finish_item();
            match result {
                Ok(result) => results.push(result),
                Err(e) => {
                    progress.finish();
                    return Err(e);
                }
            }
        }
        progress.finish();

        if results.is_empty() {
            return Err(StarsError::NoStarredInfo);
        }

        Ok(Collected { depths, results })
    }

    /// Star the eligible results
    pub fn star(
        &self,
        results: &[ResolutionResult],
        options: StarOptions,
    ) -> StarsResult<StarSummary> {
        self.starred_sync().star_all(results, options)
    }
}

fn print_summary(ctx: &UiContext, summary: &StarSummary, options: StarOptions) {
    if summary.unresolved > 0 {
        ui::step_warn_hint(
            ctx,
            &format!("{} package(s) without a known repository", summary.unresolved),
            "see --check",
        );
    }
    if summary.owned > 0 && !options.include_owner_repo {
        ui::step_warn_hint(
            ctx,
            &format!("{} owned repository(ies) skipped", summary.owned),
            "use --include-owner-repo",
        );
    }

    if options.dry_run {
        ui::note(
            ctx,
            "Dry run",
            &format!("{} repository(ies) would be starred", summary.would_star),
        );
        return;
    }

    let message = format!(
        "Starred {} repository(ies), {} already starred",
        summary.starred, summary.already_starred
    );
    if summary.failed > 0 {
        ui::outro_warn(ctx, &format!("{}, {} failed", message, summary.failed));
    } else {
        ui::outro_success(ctx, &message);
    }
}
