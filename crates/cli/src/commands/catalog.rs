//! `products` subcommands.

use threadline_core::{CategoryId, ProductId};
use threadline_storefront::Storefront;

use super::{CliError, output};
use crate::ProductsAction;

pub async fn run(store: &Storefront, action: ProductsAction) -> Result<(), CliError> {
    let catalog = store.catalog();

    match action {
        ProductsAction::Featured => output::print_products(&catalog.featured().await?),
        ProductsAction::New => output::print_products(&catalog.new_arrivals().await?),
        ProductsAction::All { page } => {
            let products = catalog.page(page).await?;
            output::print_products(&products);
            tracing::debug!(page, returned = products.len(), "Listed catalog page");
        }
        ProductsAction::Show { id } => {
            output::print_product_detail(&catalog.product(ProductId::new(id)).await?);
        }
        ProductsAction::Search { keyword, category } => {
            let products = catalog
                .search(&keyword, category.map(CategoryId::new))
                .await?;
            output::print_products(&products);
        }
    }
    Ok(())
}
