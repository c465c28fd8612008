pub mod ratio {
    /// 16:9, the canvas most letterboxed releases are encoded into.
    pub const WIDESCREEN: f64 = 16.0 / 9.0;

    /// Exclusive band treated as a nominal 16:9 container.
    pub const CONTAINER_BAND: (f64, f64) = (1.77, 1.79);

    /// Content must exceed the container ratio by more than this to count as wider.
    pub const WIDER_MARGIN: f64 = 0.01;

    pub const DEFAULT_SCREEN: f64 = 2.40;

    pub const MOVIE_FALLBACK: f64 = 2.39;
}

pub mod retry {
    use std::time::Duration;

    pub const READINESS_ATTEMPTS: u32 = 10;

    pub const READINESS_DELAY: Duration = Duration::from_millis(500);
}

pub mod rpc {
    pub const GET_ACTIVE_PLAYERS: &str = "Player.GetActivePlayers";

    pub const GET_PROPERTIES: &str = "Player.GetProperties";

    pub const GET_ITEM: &str = "Player.GetItem";

    pub const SET_VIEW_MODE: &str = "Player.SetViewMode";

    pub const GET_INFO_LABELS: &str = "XBMC.GetInfoLabels";

    /// Only non-default item properties; asking for `label` or `type` is rejected by newer hosts.
    pub const ITEM_PROPERTIES: &[&str] = &["showtitle", "premiered", "customproperties"];
}

pub mod labels {
    pub const SHOW_TITLE: &str = "VideoPlayer.TVShowTitle";

    pub const TITLE: &str = "VideoPlayer.Title";

    pub const YEAR: &str = "VideoPlayer.Year";
}

pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";
