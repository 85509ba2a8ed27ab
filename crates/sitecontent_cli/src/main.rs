//! Content store inspection entry point.
//!
//! # Responsibility
//! - Boot the content store from `SITECONTENT_*` environment variables.
//! - Print, per kind, how many records the admin and public surfaces see.

use log::error;
use sitecontent_core::{
    core_version, init_logging_from_config, notifier_for, AdminGateway, ContentKind, ContentStore,
    CoreConfig, GatewayResult, PublicReadApi, StorageShape, ALL_KINDS, DEFAULT_LANGUAGE,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("event=cli_run module=cli status=error error={message}");
            eprintln!("sitecontent: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    let config = CoreConfig::from_env().map_err(|err| err.to_string())?;
    init_logging_from_config(&config)?;

    let store = ContentStore::init(&config).map_err(|err| err.to_string())?;
    println!("sitecontent_core version={}", core_version());
    if let Some(report) = store.seed_report() {
        println!("seeded={}", report.applied_total());
    }

    {
        let notifier = notifier_for(&config);
        let admin = AdminGateway::new(&store, notifier.as_ref());
        let public = PublicReadApi::new(&store, notifier.as_ref());
        for kind in ALL_KINDS.iter().copied() {
            let (admin_count, public_count) =
                kind_counts(&admin, &public, kind).map_err(|err| err.to_string())?;
            println!("{kind} admin={admin_count} public={public_count}");
        }
    }

    store.shutdown().map_err(|err| err.to_string())
}

fn kind_counts(
    admin: &AdminGateway<'_>,
    public: &PublicReadApi<'_>,
    kind: ContentKind,
) -> GatewayResult<(usize, usize)> {
    let slug = kind.as_str();
    match kind.schema().storage {
        StorageShape::List => Ok((
            admin.list(slug)?.len(),
            public.list(slug, DEFAULT_LANGUAGE).len(),
        )),
        StorageShape::Keyed => Ok((
            admin.list_sections(slug)?.len(),
            public.sections(slug, DEFAULT_LANGUAGE).len(),
        )),
    }
}
