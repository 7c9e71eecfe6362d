use anyhow::Result;
use modlink::{Bridge, BridgeConfigBuilder};
use modlink_core::level::LevelScriptBuilder;
use modlink_core::ModId;
use modlink_script::test::RecordingRuntime;
use modlink_script::{FunctionRef, Variant};
use pretty_assertions::assert_eq;

const ENTRY_POINTS: &[&str] = &[
    "sins",
    "coss",
    "atan2s",
    "init_mario_after_warp",
    "initiate_warp",
    "reset_level",
    "network_init_object",
    "network_send_object",
    "network_send",
    "network_send_to",
    "get_texture_info",
    "djui_hud_render_texture",
    "djui_hud_render_texture_tile",
    "djui_hud_render_texture_interpolated",
    "djui_hud_render_texture_tile_interpolated",
    "level_script_parse",
    "define_custom_obj_fields",
];

fn bridge() -> Bridge {
    let mut bridge = Bridge::without_logging(BridgeConfigBuilder::new().without_logger().get());
    bridge
        .game_data_mut()
        .levels_mut()
        .insert(9, LevelScriptBuilder::new().area(1).build());
    bridge
}

#[test]
fn too_many_arguments_is_rejected_everywhere() -> Result<()> {
    let mut bridge = bridge();
    let mut rt = RecordingRuntime::new();
    let args: Vec<Variant> = (0..20).map(|_| Variant::Function(FunctionRef(1))).collect();

    for name in ENTRY_POINTS {
        let out = bridge.call(name, args.clone(), &mut rt, Some(ModId(1)));
        assert_eq!(out.count, 0, "{}", name);
        assert!(out.results.is_empty(), "{}", name);
        assert_eq!(out.diagnostics.len(), 1, "{}", name);
        assert!(
            out.diagnostics[0].starts_with(&format!("{}: improper param count", name)),
            "{}",
            out.diagnostics[0]
        );
    }

    let gd = bridge.game_data();
    assert!(gd.hud().is_empty());
    assert_eq!(gd.network().pending(), 0);
    assert!(gd.warp().pending().is_none());
    assert!(gd.warp().change_level().is_none());
    assert_eq!(gd.warp().after_warp_inits(), 0);
    assert!(gd.sync().is_empty());
    assert!(gd.custom_fields().fields(ModId(1)).is_empty());
    assert!(rt.calls().is_empty());
    assert_eq!(rt.live_refs(), 0);
    assert_eq!(bridge.diagnostics().len(), ENTRY_POINTS.len());
    Ok(())
}

#[test]
fn fixed_arity_counts_are_reported() -> Result<()> {
    let mut bridge = bridge();
    let mut rt = RecordingRuntime::new();

    let out = bridge.call("initiate_warp", vec![Variant::Int(1)], &mut rt, None);
    assert_eq!(
        out.diagnostics,
        vec!["initiate_warp: improper param count: expected 4, received 1".to_string()]
    );

    let out = bridge.call("network_init_object", vec![Variant::Nil], &mut rt, None);
    assert_eq!(
        out.diagnostics,
        vec!["network_init_object: improper param count: expected (2 - 3), received 1".to_string()]
    );
    Ok(())
}
