use std::sync::LazyLock;

use eyre::Result;
use modforge_codegen_laravel::edit::append_to_list;
use regex::Regex;

use super::HostManifest;
use crate::{HostError, HostModule};

static PROVIDER_LIST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"return\s*\[").unwrap());

/// `bootstrap/providers.php`, the Laravel 11 provider list.
#[derive(Debug, Clone)]
pub struct ProviderList {
    provider: String,
}

impl ProviderList {
    pub const FILE: &'static str = "bootstrap/providers.php";

    pub fn new(module: &HostModule) -> Self {
        Self {
            provider: module.provider.trim_start_matches('\\').to_string(),
        }
    }
}

impl HostManifest for ProviderList {
    fn relative_path(&self) -> &'static str {
        Self::FILE
    }

    fn entry(&self) -> String {
        format!("{}::class", self.provider)
    }

    fn contains(&self, content: &str) -> Result<bool> {
        // Matches both `Foo::class` and `\Foo::class`
        Ok(content.contains(&self.entry()))
    }

    fn insert(&self, content: &str) -> Result<String> {
        append_to_list(content, &PROVIDER_LIST, &[format!("{},", self.entry())]).ok_or_else(|| {
            HostError::RegionNotFound {
                path: Self::FILE.into(),
                region: "the returned provider array",
            }
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROVIDERS: &str = "<?php\n\nreturn [\n    App\\Providers\\AppServiceProvider::class,\n    App\\Providers\\Filament\\AdminPanelProvider::class,\n];\n";

    #[test]
    fn test_insert_appends_provider() {
        let list = ProviderList::new(&HostModule::shop());
        assert!(!list.contains(PROVIDERS).unwrap());

        let updated = list.insert(PROVIDERS).unwrap();
        insta::assert_snapshot!(updated, @r"
        <?php

        return [
            App\Providers\AppServiceProvider::class,
            App\Providers\Filament\AdminPanelProvider::class,
            Modules\Shop\Providers\ShopServiceProvider::class,
        ];
        ");
        assert!(list.contains(&updated).unwrap());
    }

    #[test]
    fn test_insert_without_list_is_an_error() {
        let list = ProviderList::new(&HostModule::shop());
        let err = list.insert("<?php\n\n// nothing here\n").unwrap_err();
        assert!(err.to_string().contains("provider array"));
    }
}
