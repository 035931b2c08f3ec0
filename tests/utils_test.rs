use setlistify::types::{Credential, ExternalSong, ResolvedTrack, Setlist, SetlistSong};
use setlistify::utils::*;

// Helper function to create a test setlist
fn create_test_setlist(songs: Vec<SetlistSong>) -> Setlist {
    Setlist {
        id: "63de4613".to_string(),
        title: "Summer Tour".to_string(),
        event_date: "23-08-1964".to_string(),
        artist: "The Beatles".to_string(),
        venue: "Hollywood Bowl".to_string(),
        city: "Los Angeles".to_string(),
        country: "United States".to_string(),
        songs,
    }
}

fn song(name: &str) -> SetlistSong {
    SetlistSong {
        name: name.to_string(),
        is_cover: false,
        cover_artist: None,
    }
}

fn cover(name: &str, original: Option<&str>) -> SetlistSong {
    SetlistSong {
        name: name.to_string(),
        is_cover: true,
        cover_artist: original.map(str::to_string),
    }
}

#[test]
fn test_extract_code_from_redirect_target() {
    assert_eq!(
        extract_code("/callback?code=ABC123&state=xyz"),
        Some("ABC123".to_string())
    );

    // code does not have to be the first parameter
    assert_eq!(
        extract_code("/callback?state=xyz&code=ABC123"),
        Some("ABC123".to_string())
    );

    // fragment ends the value
    assert_eq!(
        extract_code("/callback?code=ABC123#_=_"),
        Some("ABC123".to_string())
    );

    // any path works
    assert_eq!(extract_code("/?code=q"), Some("q".to_string()));
}

#[test]
fn test_extract_code_without_code() {
    assert_eq!(extract_code("/favicon.ico"), None);
    assert_eq!(extract_code("/callback"), None);
    assert_eq!(extract_code("/callback?state=xyz"), None);
    assert_eq!(extract_code("/callback?error=access_denied"), None);

    // a key merely ending in "code" is not the code
    assert_eq!(extract_code("/callback?error_code=1"), None);

    // empty value counts as no code
    assert_eq!(extract_code("/callback?code=&state=xyz"), None);
    assert_eq!(extract_code("/callback?code"), None);
}

#[test]
fn test_extract_code_decodes_percent_escapes() {
    assert_eq!(
        extract_code("/callback?code=AQ%2Fb%3D"),
        Some("AQ/b=".to_string())
    );
}

#[test]
fn test_track_query() {
    assert_eq!(
        track_query("Help!", "The Beatles"),
        "track:Help! artist:The Beatles"
    );
}

#[test]
fn test_artist_for() {
    let own = ExternalSong::new("Help!");
    assert_eq!(artist_for(&own, "The Beatles"), "The Beatles");

    let covered = ExternalSong::performed_by("Twist and Shout", "The Isley Brothers");
    assert_eq!(artist_for(&covered, "The Beatles"), "The Isley Brothers");

    // whitespace-only override falls back too
    let blank = ExternalSong::performed_by("Help!", "  ");
    assert_eq!(artist_for(&blank, "The Beatles"), "The Beatles");
}

#[test]
fn test_songs_from_setlist() {
    let setlist = create_test_setlist(vec![
        song("Help!"),
        cover("Twist and Shout", Some("The Isley Brothers")),
        cover("Long Tall Sally", None),
    ]);

    let songs = songs_from_setlist(&setlist);

    assert_eq!(
        songs,
        vec![
            ExternalSong::new("Help!"),
            ExternalSong::performed_by("Twist and Shout", "The Isley Brothers"),
            // cover with unknown original is searched under the performer
            ExternalSong::new("Long Tall Sally"),
        ]
    );
}

#[test]
fn test_songs_from_empty_setlist() {
    let setlist = create_test_setlist(Vec::new());
    assert!(songs_from_setlist(&setlist).is_empty());
}

#[test]
fn test_playlist_naming() {
    let setlist = create_test_setlist(vec![song("Help!")]);

    assert_eq!(
        playlist_name_suggestion(&setlist),
        "The Beatles @ Hollywood Bowl (23-08-1964)"
    );
    assert_eq!(
        playlist_description("The Beatles"),
        "Live setlist of The Beatles, imported from setlist.fm"
    );
    assert_eq!(
        playlist_url("playlist-1"),
        "https://open.spotify.com/playlist/playlist-1"
    );
}

#[test]
fn test_resolved_track_uri() {
    let track = ResolvedTrack {
        provider_track_id: "4uLU6hMCjMI75M1A2tKUQC".to_string(),
    };
    assert_eq!(track.uri(), "spotify:track:4uLU6hMCjMI75M1A2tKUQC");
}

#[test]
fn test_credential_expiry_boundary() {
    let credential = Credential {
        access_token: "a".to_string(),
        refresh_token: "r".to_string(),
        expires_in: 3600,
        token_type: "Bearer".to_string(),
        issued_at: 1_000_000,
    };

    // stale five minutes before the real expiry
    let boundary = 1_000_000 + (3600 - 300) * 1000;
    assert_eq!(credential.stale_at(), boundary);
    assert!(!credential.is_expired_at(boundary - 1));
    assert!(credential.is_expired_at(boundary));
    assert!(credential.is_expired_at(boundary + 1));

    assert_eq!(credential.authorization_header(), "Bearer a");
}

#[test]
fn test_short_lived_credential_is_immediately_stale() {
    let credential = Credential {
        access_token: "a".to_string(),
        refresh_token: "r".to_string(),
        expires_in: 60,
        token_type: "Bearer".to_string(),
        issued_at: now_ms(),
    };

    // lifetime shorter than the margin
    assert!(credential.is_expired_at(now_ms()));
}
