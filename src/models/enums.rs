// src/models/enums.rs
//
// Valores canônicos (sempre minúsculos, exceto os grupos de usuário) e as
// tabelas estáticas que traduzem os rótulos exibidos no frontend.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// Normalização comum: trim + minúsculas
fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

// =============================================================================
//  PRIORIDADE (incidentes e changes)
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "prioridade", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Prioridade {
    Critica,
    Alta,
    Media,
    Baixa,
}

impl Prioridade {
    pub const ALL: [Prioridade; 4] = [Self::Critica, Self::Alta, Self::Media, Self::Baixa];
    pub const DOMINIO: &'static [&'static str] = &["critica", "alta", "media", "baixa"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critica => "critica",
            Self::Alta => "alta",
            Self::Media => "media",
            Self::Baixa => "baixa",
        }
    }

    /// Rótulos do frontend: "Crítico", "Alto", "Moderado".
    pub fn from_filter_label(label: &str) -> Option<Self> {
        match label {
            "Crítico" => Some(Self::Critica),
            "Alto" => Some(Self::Alta),
            "Moderado" => Some(Self::Media),
            other => other.parse().ok(),
        }
    }
}

impl FromStr for Prioridade {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "critica" => Ok(Self::Critica),
            "alta" => Ok(Self::Alta),
            "media" => Ok(Self::Media),
            "baixa" => Ok(Self::Baixa),
            _ => Err(()),
        }
    }
}

// =============================================================================
//  INCIDENTES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "incidente_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum IncidentStatus {
    Aberto,
    EmAndamento,
    EmEspera,
    Resolvido,
    Fechado,
    TksRemoto,
}

impl IncidentStatus {
    // Ordem usada nas estatísticas do dashboard
    pub const ALL: [IncidentStatus; 6] = [
        Self::EmAndamento,
        Self::EmEspera,
        Self::TksRemoto,
        Self::Aberto,
        Self::Resolvido,
        Self::Fechado,
    ];
    pub const DOMINIO: &'static [&'static str] =
        &["aberto", "em_andamento", "em_espera", "resolvido", "fechado", "tks_remoto"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aberto => "aberto",
            Self::EmAndamento => "em_andamento",
            Self::EmEspera => "em_espera",
            Self::Resolvido => "resolvido",
            Self::Fechado => "fechado",
            Self::TksRemoto => "tks_remoto",
        }
    }

    pub fn from_filter_label(label: &str) -> Option<Self> {
        match label {
            "Em andamento" => Some(Self::EmAndamento),
            "Em espera" => Some(Self::EmEspera),
            "TKS Remoto" => Some(Self::TksRemoto),
            "Aberto" => Some(Self::Aberto),
            other => other.parse().ok(),
        }
    }
}

impl FromStr for IncidentStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "aberto" => Ok(Self::Aberto),
            "em_andamento" => Ok(Self::EmAndamento),
            "em_espera" => Ok(Self::EmEspera),
            "resolvido" => Ok(Self::Resolvido),
            "fechado" => Ok(Self::Fechado),
            "tks_remoto" => Ok(Self::TksRemoto),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "tipo_tarefa", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TipoTarefa {
    Manutencao,
    Suporte,
    Configuracao,
    Atualizacao,
    Investigacao,
}

impl TipoTarefa {
    pub const DOMINIO: &'static [&'static str] =
        &["manutencao", "suporte", "configuracao", "atualizacao", "investigacao"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manutencao => "manutencao",
            Self::Suporte => "suporte",
            Self::Configuracao => "configuracao",
            Self::Atualizacao => "atualizacao",
            Self::Investigacao => "investigacao",
        }
    }
}

impl FromStr for TipoTarefa {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "manutencao" => Ok(Self::Manutencao),
            "suporte" => Ok(Self::Suporte),
            "configuracao" => Ok(Self::Configuracao),
            "atualizacao" => Ok(Self::Atualizacao),
            "investigacao" => Ok(Self::Investigacao),
            _ => Err(()),
        }
    }
}

/// Filas de atendimento: o rótulo do filtro `fila` vira o valor gravado em `local_problema`.
pub const FILAS: [(&str, &str); 7] = [
    ("P2K", "fila_p2k"),
    ("CRIVO", "fila_crivo"),
    ("SG5_URA", "sg5_ura"),
    ("ALARMES", "alarmes"),
    ("TSK_VENDAS", "tsk_vendas"),
    ("SR", "sr"),
    ("RIT", "rit"),
];

pub fn fila_from_label(label: &str) -> Option<&'static str> {
    FILAS
        .iter()
        .find(|(rotulo, canonico)| *rotulo == label || *canonico == label)
        .map(|(_, canonico)| *canonico)
}

// =============================================================================
//  CHANGES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "change_tipo", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ChangeTipo {
    Manutencao,
    Atualizacao,
    Configuracao,
    Migracao,
    Correcao,
}

impl ChangeTipo {
    pub const DOMINIO: &'static [&'static str] =
        &["manutencao", "atualizacao", "configuracao", "migracao", "correcao"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manutencao => "manutencao",
            Self::Atualizacao => "atualizacao",
            Self::Configuracao => "configuracao",
            Self::Migracao => "migracao",
            Self::Correcao => "correcao",
        }
    }
}

impl FromStr for ChangeTipo {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "manutencao" => Ok(Self::Manutencao),
            "atualizacao" => Ok(Self::Atualizacao),
            "configuracao" => Ok(Self::Configuracao),
            "migracao" => Ok(Self::Migracao),
            "correcao" => Ok(Self::Correcao),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "change_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ChangeStatus {
    Pendente,
    Aprovada,
    EmExecucao,
    Concluida,
    Cancelada,
}

impl ChangeStatus {
    pub const ALL: [ChangeStatus; 5] = [
        Self::Pendente,
        Self::Aprovada,
        Self::EmExecucao,
        Self::Concluida,
        Self::Cancelada,
    ];
    pub const DOMINIO: &'static [&'static str] =
        &["pendente", "aprovada", "em_execucao", "concluida", "cancelada"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pendente => "pendente",
            Self::Aprovada => "aprovada",
            Self::EmExecucao => "em_execucao",
            Self::Concluida => "concluida",
            Self::Cancelada => "cancelada",
        }
    }

    pub fn from_filter_label(label: &str) -> Option<Self> {
        match label {
            "Pendente" => Some(Self::Pendente),
            "Aprovada" => Some(Self::Aprovada),
            "Em execução" => Some(Self::EmExecucao),
            "Concluída" => Some(Self::Concluida),
            "Cancelada" => Some(Self::Cancelada),
            other => other.parse().ok(),
        }
    }
}

impl FromStr for ChangeStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "pendente" => Ok(Self::Pendente),
            "aprovada" => Ok(Self::Aprovada),
            "em_execucao" => Ok(Self::EmExecucao),
            "concluida" => Ok(Self::Concluida),
            "cancelada" => Ok(Self::Cancelada),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "impacto", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Impacto {
    Baixo,
    Medio,
    Alto,
    Critico,
}

impl Impacto {
    pub const DOMINIO: &'static [&'static str] = &["baixo", "medio", "alto", "critico"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Baixo => "baixo",
            Self::Medio => "medio",
            Self::Alto => "alto",
            Self::Critico => "critico",
        }
    }

    pub fn from_filter_label(label: &str) -> Option<Self> {
        match label {
            "Baixo" => Some(Self::Baixo),
            "Médio" => Some(Self::Medio),
            "Alto" => Some(Self::Alto),
            "Crítico" => Some(Self::Critico),
            other => other.parse().ok(),
        }
    }
}

impl FromStr for Impacto {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "baixo" => Ok(Self::Baixo),
            "medio" => Ok(Self::Medio),
            "alto" => Ok(Self::Alto),
            "critico" => Ok(Self::Critico),
            _ => Err(()),
        }
    }
}

// =============================================================================
//  GRUPOS DE USUÁRIO (comparação exata, sem normalização)
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "grupo_usuario")]
pub enum UserGroup {
    #[serde(rename = "TI Infraestrutura")]
    #[sqlx(rename = "TI Infraestrutura")]
    Infraestrutura,
    #[serde(rename = "TI Sistemas")]
    #[sqlx(rename = "TI Sistemas")]
    Sistemas,
    #[serde(rename = "TI Vendas")]
    #[sqlx(rename = "TI Vendas")]
    Vendas,
    #[serde(rename = "TI Monitoramento")]
    #[sqlx(rename = "TI Monitoramento")]
    Monitoramento,
    #[serde(rename = "TI Dados")]
    #[sqlx(rename = "TI Dados")]
    Dados,
    #[serde(rename = "TI Segurança")]
    #[sqlx(rename = "TI Segurança")]
    Seguranca,
    #[serde(rename = "TI Integração")]
    #[sqlx(rename = "TI Integração")]
    Integracao,
}

impl UserGroup {
    pub const ALL: [UserGroup; 7] = [
        Self::Infraestrutura,
        Self::Sistemas,
        Self::Vendas,
        Self::Monitoramento,
        Self::Dados,
        Self::Seguranca,
        Self::Integracao,
    ];
    pub const DOMINIO: &'static [&'static str] = &[
        "TI Infraestrutura",
        "TI Sistemas",
        "TI Vendas",
        "TI Monitoramento",
        "TI Dados",
        "TI Segurança",
        "TI Integração",
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Infraestrutura => "TI Infraestrutura",
            Self::Sistemas => "TI Sistemas",
            Self::Vendas => "TI Vendas",
            Self::Monitoramento => "TI Monitoramento",
            Self::Dados => "TI Dados",
            Self::Seguranca => "TI Segurança",
            Self::Integracao => "TI Integração",
        }
    }
}

impl FromStr for UserGroup {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|g| g.as_str() == s).ok_or(())
    }
}

// Display para logs e para as chaves das estatísticas
macro_rules! display_as_str {
    ($($t:ty),*) => {
        $(impl fmt::Display for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(Prioridade, IncidentStatus, TipoTarefa, ChangeTipo, ChangeStatus, Impacto, UserGroup);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_values_are_normalized() {
        assert_eq!("ALTA".parse::<Prioridade>(), Ok(Prioridade::Alta));
        assert_eq!(" Em_Andamento ".parse::<IncidentStatus>(), Ok(IncidentStatus::EmAndamento));
        assert_eq!("MIGRACAO".parse::<ChangeTipo>(), Ok(ChangeTipo::Migracao));
        assert!("urgente".parse::<Prioridade>().is_err());
    }

    #[test]
    fn filter_labels_translate_to_canonical() {
        assert_eq!(Prioridade::from_filter_label("Crítico"), Some(Prioridade::Critica));
        assert_eq!(IncidentStatus::from_filter_label("Aberto"), Some(IncidentStatus::Aberto));
        assert_eq!(ChangeStatus::from_filter_label("Em execução"), Some(ChangeStatus::EmExecucao));
        assert_eq!(Impacto::from_filter_label("Médio"), Some(Impacto::Medio));
        assert_eq!(fila_from_label("P2K"), Some("fila_p2k"));
    }

    #[test]
    fn unknown_labels_are_none() {
        assert_eq!(Prioridade::from_filter_label("Urgentíssimo"), None);
        assert_eq!(IncidentStatus::from_filter_label("Perdido"), None);
        assert_eq!(fila_from_label("XPTO"), None);
    }

    #[test]
    fn user_groups_match_exactly() {
        assert_eq!("TI Segurança".parse::<UserGroup>(), Ok(UserGroup::Seguranca));
        assert!("ti segurança".parse::<UserGroup>().is_err());
    }

    #[test]
    fn serde_uses_canonical_names() {
        let json = serde_json::to_string(&IncidentStatus::TksRemoto).unwrap();
        assert_eq!(json, "\"tks_remoto\"");
        let json = serde_json::to_string(&UserGroup::Integracao).unwrap();
        assert_eq!(json, "\"TI Integração\"");
    }
}
