use anyhow::Result;
use clap::{Args, Subcommand};
use modelprice_core::*;
use modelprice_report::{json as jreport, terminal};

use super::{AppContext, OutputFormat};

#[derive(Args)]
pub struct ListArgs {
    #[command(subcommand)]
    pub subcommand: ListSubcommand,
}

#[derive(Subcommand)]
pub enum ListSubcommand {
    /// List models in the catalog
    Models {
        /// Only models from this provider id
        #[arg(long, conflicts_with = "free")]
        provider: Option<String>,

        /// Only free models (zero input price)
        #[arg(long)]
        free: bool,

        /// Case-insensitive search over name, description, provider and features
        #[arg(long)]
        search: Option<String>,

        /// Sort by: name (default), price-asc, price-desc, context, release
        #[arg(long, default_value = "name")]
        sort: String,

        /// Limit results
        #[arg(long)]
        limit: Option<usize>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// List providers with model counts and input price ranges
    Providers {
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
}

pub fn build_filter(provider: Option<&str>, free: bool, search: Option<String>) -> ModelFilter {
    let provider = if free {
        ProviderFilter::Free
    } else {
        provider.map(ProviderFilter::from).unwrap_or_default()
    };
    ModelFilter { provider, search }
}

const LIST_FORMATS: &[OutputFormat] = &[OutputFormat::Table, OutputFormat::Json];

pub fn run(args: ListArgs, ctx: &AppContext) -> Result<()> {
    let catalog = &ctx.catalog;
    match args.subcommand {
        ListSubcommand::Models {
            provider,
            free,
            search,
            sort,
            limit,
            format,
        } => {
            format.ensure("list", LIST_FORMATS, None)?;
            let key: SortKey = sort.parse()?;
            let filter = build_filter(provider.as_deref(), free, search);

            let mut models = catalog.filter(&filter);
            sort_models(&mut models, key);
            if let Some(n) = limit {
                models.truncate(n);
            }

            match format {
                OutputFormat::Json => println!("{}", jreport::render_models(&models)?),
                _ => terminal::print_model_list(&models, catalog),
            }
        }
        ListSubcommand::Providers { format } => {
            format.ensure("list", LIST_FORMATS, None)?;
            match format {
                OutputFormat::Json => println!("{}", jreport::render_providers(catalog)?),
                _ => {
                    terminal::print_provider_list(catalog);
                    terminal::print_statistics(catalog);
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::test_context;

    #[test]
    fn free_flag_wins_over_provider() {
        let ctx = test_context();
        let filter = build_filter(None, true, None);
        let ids: Vec<&str> = ctx.catalog.filter(&filter).iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["flash"]);
    }

    #[test]
    fn provider_and_search_combine() {
        let ctx = test_context();
        let filter = build_filter(Some("openai"), false, Some("MINI".to_string()));
        let ids: Vec<&str> = ctx.catalog.filter(&filter).iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["gpt-4o-mini"]);
    }

    #[test]
    fn html_listing_is_rejected() {
        let ctx = test_context();
        let args = ListArgs {
            subcommand: ListSubcommand::Providers {
                format: OutputFormat::Html,
            },
        };
        assert!(run(args, &ctx).is_err());
    }

    #[test]
    fn no_flags_lists_everything() {
        let ctx = test_context();
        assert_eq!(ctx.catalog.filter(&build_filter(None, false, None)).len(), 6);
    }
}
