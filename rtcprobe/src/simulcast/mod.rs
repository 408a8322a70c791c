
use log::debug;
use rand::Rng;
use sdp::description::{SessionDescription, Source, SourceGroup};
use shared::util::random_ssrc;

pub const SEMANTICS_SIMULCAST: &str = "SIM";
pub const SEMANTICS_FLOW_ID: &str = "FID";

const MEDIA_VIDEO: &str = "video";

/// Adds a second simulcast layer and an RTX stream to every video content
/// that sends a source and carries no `SIM` group yet.
///
/// The new sources copy the primary source's attributes (cname, msid, ...)
/// so the remote end associates them with the same track. Returns the
/// number of contents changed.
pub fn apply<R: Rng + ?Sized>(session: &mut SessionDescription, rng: &mut R) -> usize {
    let mut changed = 0;

    for content in &mut session.contents {
        let name = content.name.clone();
        let Some(app) = content.rtp_mut() else {
            continue;
        };
        if app.media != MEDIA_VIDEO
            || app.sources.is_empty()
            || app
                .source_groups
                .iter()
                .any(|g| g.semantics == SEMANTICS_SIMULCAST)
        {
            continue;
        }

        let Some(primary) = app.sources[0].ssrc.or(app.ssrc) else {
            continue;
        };
        let parameters = app
            .sources
            .iter()
            .find(|s| s.ssrc.or(app.ssrc) == Some(primary))
            .map(|s| s.parameters.clone())
            .unwrap_or_default();

        let mut taken: Vec<u32> = app.sources.iter().filter_map(|s| s.ssrc).collect();
        taken.push(primary);
        let layer = random_ssrc(rng, &taken);
        taken.push(layer);
        let rtx = random_ssrc(rng, &taken);

        for ssrc in [layer, rtx] {
            app.sources.push(Source {
                ssrc: Some(ssrc),
                parameters: parameters.clone(),
            });
        }
        app.source_groups.push(SourceGroup {
            semantics: SEMANTICS_SIMULCAST.to_owned(),
            sources: vec![primary, layer],
        });
        app.source_groups.push(SourceGroup {
            semantics: SEMANTICS_FLOW_ID.to_owned(),
            sources: vec![primary, rtx],
        });

        debug!("simulcast on {name:?}: primary {primary}, layer {layer}, rtx {rtx}");
        changed += 1;
    }

    changed
}
