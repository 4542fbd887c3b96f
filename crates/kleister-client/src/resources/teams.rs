use kleister_api_models::{
    ModTeam, ModTeamParams, PackTeam, PackTeamParams, Team, TeamParams, TeamPatch, TeamUser,
    TeamUserParams,
};

use crate::api::{Kleister, UpdateOutcome, changed};
use crate::error::{Error, Result};
use crate::resources::item_path;
use crate::transport::Transport;

impl<T: Transport> Kleister<T> {
    /// List all teams.
    ///
    /// # Errors
    ///
    /// Returns the classified transport error.
    pub async fn list_teams(&self) -> Result<Vec<Team>> {
        self.get("/api/teams").await
    }

    /// Fetch one team by id or slug.
    ///
    /// # Errors
    ///
    /// Returns the classified transport error.
    pub async fn get_team(&self, team: &str) -> Result<Team> {
        self.get(&item_path("team", "teams", team)?).await
    }

    /// Create a team.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty name.
    pub async fn create_team(&self, params: &TeamParams) -> Result<Team> {
        if params.name.trim().is_empty() {
            return Err(Error::validation("missing team name"));
        }
        self.post("/api/teams", params).await
    }

    /// Apply the fields of `requested` that differ from the server state.
    ///
    /// # Errors
    ///
    /// Returns the classified transport error of the fetch or the PATCH.
    pub async fn update_team(&self, team: &str, requested: &TeamPatch) -> Result<UpdateOutcome<Team>> {
        let path = item_path("team", "teams", team)?;
        let current: Team = self.get(&path).await?;

        let patch = TeamPatch {
            slug: changed(current.slug.as_str(), requested.slug.as_deref()),
            name: changed(current.name.as_str(), requested.name.as_deref()),
        };

        if patch.is_empty() {
            return Ok(UpdateOutcome::Unchanged);
        }
        self.patch(&path, &patch).await.map(UpdateOutcome::Updated)
    }

    /// Delete a team.
    ///
    /// # Errors
    ///
    /// Returns the classified transport error.
    pub async fn delete_team(&self, team: &str) -> Result<()> {
        self.delete::<()>(&item_path("team", "teams", team)?, None).await
    }
}

permissioned!(
    "team" / "user",
    path: ("teams", "users"),
    row: TeamUser,
    params: TeamUserParams { team, user },
    list: list_team_users,
    append: append_team_user,
    update: update_team_user,
    remove: remove_team_user,
);

permissioned!(
    "team" / "mod",
    path: ("teams", "mods"),
    row: ModTeam,
    params: ModTeamParams { team, module },
    list: list_team_mods,
    append: append_team_mod,
    update: update_team_mod,
    remove: remove_team_mod,
);

permissioned!(
    "team" / "pack",
    path: ("teams", "packs"),
    row: PackTeam,
    params: PackTeamParams { team, pack },
    list: list_team_packs,
    append: append_team_pack,
    update: update_team_pack,
    remove: remove_team_pack,
);
