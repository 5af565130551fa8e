use serde::{Deserialize, Serialize};
use url::Url;

pub const DEFAULT_SOURCE_BASE_URL: &str = "http://vitibrasil.cnpuv.embrapa.br/index.php";
pub const DEFAULT_ACCESS_TOKEN_TTL_SECONDS: i64 = 15 * 60;
pub const SOURCE_OPTION_QUERY_KEY: &str = "opcao";

/// Data sets published by the source site, one per route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Report {
    Producao,
    Processamento,
    Comercializacao,
    Importacao,
    Exportacao,
}

impl Report {
    pub const ALL: [Self; 5] = [
        Self::Producao,
        Self::Processamento,
        Self::Comercializacao,
        Self::Importacao,
        Self::Exportacao,
    ];

    pub const fn path(self) -> &'static str {
        match self {
            Self::Producao => "/producao",
            Self::Processamento => "/processamento",
            Self::Comercializacao => "/comercializacao",
            Self::Importacao => "/importacao",
            Self::Exportacao => "/exportacao",
        }
    }

    /// Value of the source site's `opcao` query parameter.
    pub const fn source_option(self) -> &'static str {
        match self {
            Self::Producao => "opt_02",
            Self::Processamento => "opt_03",
            Self::Comercializacao => "opt_04",
            Self::Importacao => "opt_05",
            Self::Exportacao => "opt_06",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Producao => "production",
            Self::Processamento => "processing",
            Self::Comercializacao => "commercialization",
            Self::Importacao => "import",
            Self::Exportacao => "export",
        }
    }

    pub fn source_url(self, base_url: &str) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(base_url)?;
        url.query_pairs_mut()
            .append_pair(SOURCE_OPTION_QUERY_KEY, self.source_option());
        Ok(url)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessTokenResponse {
    pub access_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}
