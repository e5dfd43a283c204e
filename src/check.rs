use std::path::PathBuf;

use anyhow::Context as _;

use crate::cli::CheckArgs;
use crate::document::{self, PageModel};

pub fn run(args: CheckArgs) -> anyhow::Result<()> {
    let path = PathBuf::from(&args.page);
    let doc = document::load(&path)?;

    let issues = document::lint(&doc);
    if !issues.is_empty() {
        for issue in &issues {
            println!("{issue}");
        }
        anyhow::bail!("{} issue(s) found in {}", issues.len(), path.display());
    }

    // The lint catches structural problems; building the model proves the
    // associations resolve.
    let model = PageModel::from_document(&doc).context("build page model")?;
    println!(
        "{}: ok ({} sections, {} menu items, {} forms)",
        path.display(),
        model.sections().len(),
        doc.menu_items.len(),
        doc.forms.len()
    );
    Ok(())
}
