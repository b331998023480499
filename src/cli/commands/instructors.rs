use clap::{Args, Subcommand};
use uuid::Uuid;

use crate::cli::utils::{listing_line, output_rows};
use crate::cli::{CliContext, OutputFormat};
use crate::directory::{top_rated, DirectoryFilter};
use crate::services::DirectoryService;
use crate::store::ReviewOrder;

#[derive(Debug, Args)]
pub struct ListArgs {
    #[arg(long, help = "Category to match (repeatable, any match)")]
    pub category: Vec<String>,
    #[arg(long, help = "Minimum average rating; unrated counts as 0")]
    pub min_rating: Option<f64>,
    #[arg(long, help = "Case-insensitive search over name, specialty and categories")]
    pub search: Option<String>,
    #[arg(long, help = "Exact \"city, state\" location")]
    pub location: Option<String>,
}

impl ListArgs {
    fn into_filter(self) -> DirectoryFilter {
        let mut filter = self
            .category
            .into_iter()
            .fold(DirectoryFilter::new(), |f, c| f.category(c));
        if let Some(min) = self.min_rating {
            filter = filter.min_rating(min);
        }
        if let Some(search) = self.search {
            filter = filter.search(search);
        }
        if let Some(location) = self.location {
            filter = filter.location(location);
        }
        filter
    }
}

#[derive(Subcommand)]
pub enum InstructorCommands {
    #[command(about = "List instructors, optionally filtered")]
    List(ListArgs),

    #[command(about = "Highest rated instructors")]
    Top {
        #[arg(long, help = "How many to show (defaults to DIRECTORY_TOP_N)")]
        limit: Option<usize>,
    },

    #[command(about = "Distinct locations in the directory")]
    Locations,

    #[command(about = "Show one instructor with reviews")]
    Show {
        #[arg(help = "Instructor id")]
        id: Uuid,
        #[arg(long, default_value = "newest", help = "Review order: newest, oldest, highest, lowest")]
        sort: ReviewOrder,
    },
}

pub async fn handle(ctx: &CliContext, cmd: InstructorCommands) -> anyhow::Result<()> {
    let service = DirectoryService::new(ctx.stores.directory.clone(), ctx.config.directory.top_n);

    match cmd {
        InstructorCommands::List(args) => {
            let filter = args.into_filter();
            let listings = service.fetch_listings().await?;
            let matched = filter.apply_owned(listings.items);
            output_rows(ctx.output, &matched, "No instructors match", listing_line)
        }
        InstructorCommands::Top { limit } => {
            let listings = service.fetch_listings().await?;
            let top = top_rated(&listings.items, limit.unwrap_or(ctx.config.directory.top_n));
            output_rows(ctx.output, &top, "No instructors yet", listing_line)
        }
        InstructorCommands::Locations => {
            let locations = service.locations().await?;
            output_rows(ctx.output, &locations, "No locations yet", |l| l.clone())
        }
        InstructorCommands::Show { id, sort } => {
            let detail = service.instructor_detail(id, sort).await?;
            match ctx.output {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&detail)?),
                OutputFormat::Text => {
                    println!("{}", listing_line(&detail.listing));
                    if let Some(bio) = &detail.listing.profile.bio {
                        println!("\n{}\n", bio);
                    }
                    for review in &detail.reviews {
                        println!("  {}★  {}", review.rating, review.body);
                    }
                }
            }
            Ok(())
        }
    }
}
