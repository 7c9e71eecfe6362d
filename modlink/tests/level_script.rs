use anyhow::Result;
use modlink::{Bridge, BridgeConfigBuilder, ParseState};
use modlink_core::behavior::BehaviorId;
use modlink_core::level::LevelScriptBuilder;
use modlink_core::ModId;
use modlink_script::test::RecordingRuntime;
use modlink_script::{Composite, FunctionRef, Variant};
use pretty_assertions::assert_eq;

const CALLBACK: FunctionRef = FunctionRef(7);

fn bridge() -> Bridge {
    Bridge::without_logging(BridgeConfigBuilder::new().without_logger().get())
}

fn parse(bridge: &mut Bridge, rt: &mut RecordingRuntime, level: i32) -> usize {
    let args = vec![level.into(), Variant::Function(CALLBACK)];
    bridge.call("level_script_parse", args, rt, Some(ModId(3))).count
}

#[test]
fn object_commands_fill_only_the_second_slot() -> Result<()> {
    let mut bridge = bridge();
    let goomba = BehaviorId::Goomba.id();
    bridge.game_data_mut().levels_mut().insert(
        9,
        LevelScriptBuilder::new()
            .object(goomba, 0x0001_0000)
            .object(goomba, 0x0002_0000)
            .object(goomba, 0x0003_0000)
            .build(),
    );

    let mut rt = RecordingRuntime::new();
    assert_eq!(parse(&mut bridge, &mut rt, 9), 1);
    assert_eq!(rt.calls().len(), 3);

    for (i, call) in rt.calls().iter().enumerate() {
        assert_eq!(call.function, CALLBACK);
        assert_eq!(call.owner, Some(ModId(3)));
        assert_eq!(call.args.len(), 4);
        assert!(call.args[0].is_nil());
        assert!(call.args[2].is_nil());
        assert!(call.args[3].is_nil());
        let record = call.args[1].as_table().unwrap();
        assert_eq!(record.get_str("behavior"), Some(&Variant::Int(goomba as i64)));
        assert_eq!(
            record.get_str("behaviorArg"),
            Some(&Variant::Int(((i as i64) + 1) << 16))
        );
    }

    assert_eq!(rt.live_refs(), 0);
    assert_eq!(bridge.game_data().level_script_parse().state(), ParseState::Idle);
    Ok(())
}

#[test]
fn empty_macro_array_yields_two_empty_sequences() -> Result<()> {
    let mut bridge = bridge();
    bridge
        .game_data_mut()
        .levels_mut()
        .insert(4, LevelScriptBuilder::new().macro_objects(&[]).build());

    let mut rt = RecordingRuntime::new();
    assert_eq!(parse(&mut bridge, &mut rt, 4), 1);
    assert_eq!(rt.calls().len(), 1);

    let args = &rt.calls()[0].args;
    assert!(args[0].is_nil());
    assert!(args[1].is_nil());
    assert!(args[2].as_table().unwrap().is_empty());
    assert!(args[3].as_table().unwrap().is_empty());
    Ok(())
}

#[test]
fn macro_objects_resolve_presets() -> Result<()> {
    let mut bridge = bridge();
    // preset 8 with its behavior parameter in the high byte of word 4
    let entry = [0x1F + 8, 0, 0, 0, 0x0500];
    bridge
        .game_data_mut()
        .levels_mut()
        .insert(4, LevelScriptBuilder::new().area(1).macro_objects(&[entry]).build());

    let mut rt = RecordingRuntime::new();
    assert_eq!(parse(&mut bridge, &mut rt, 4), 1);
    assert_eq!(rt.calls().len(), 2);
    assert_eq!(rt.calls()[0].args[0], Variant::Int(1));

    let args = &rt.calls()[1].args;
    assert_eq!(
        args[2].as_table().unwrap().values().cloned().collect::<Vec<_>>(),
        vec![Variant::Int(BehaviorId::Goomba.id() as i64)]
    );
    assert_eq!(
        args[3].as_table().unwrap().values().cloned().collect::<Vec<_>>(),
        vec![Variant::Int(0x0500)]
    );
    Ok(())
}

#[test]
fn missing_level_makes_no_callbacks() -> Result<()> {
    let mut bridge = bridge();
    let mut rt = RecordingRuntime::new();
    assert_eq!(parse(&mut bridge, &mut rt, 12), 0);
    assert!(rt.calls().is_empty());
    assert_eq!(rt.live_refs(), 0);

    let out = bridge.call(
        "level_script_parse",
        vec![12.into(), "not a function".into()],
        &mut rt,
        None,
    );
    assert_eq!(out.count, 0);
    assert_eq!(
        out.diagnostics,
        vec!["level_script_parse: failed to convert parameter 2: expected function, received string".to_string()]
    );
    Ok(())
}

#[test]
fn each_parse_uses_only_its_own_callback() -> Result<()> {
    let mut bridge = bridge();
    bridge
        .game_data_mut()
        .levels_mut()
        .insert(9, LevelScriptBuilder::new().area(1).area(2).build());

    let mut rt = RecordingRuntime::new();
    assert_eq!(parse(&mut bridge, &mut rt, 9), 1);
    let args = vec![9.into(), Variant::Function(FunctionRef(8))];
    assert_eq!(bridge.call("level_script_parse", args, &mut rt, None).count, 1);

    assert_eq!(rt.calls_to(CALLBACK).count(), 2);
    assert_eq!(rt.calls_to(FunctionRef(8)).count(), 2);
    assert_eq!(rt.released().len(), 2);
    assert_eq!(rt.live_refs(), 0);
    Ok(())
}

#[test]
fn callback_can_call_bound_functions_mid_walk() -> Result<()> {
    let mut bridge = bridge();
    let info = bridge
        .game_data_mut()
        .textures_mut()
        .register("brick", 32, 16, 16, vec![0; 16 * 16 * 4]);
    bridge
        .game_data_mut()
        .levels_mut()
        .insert(9, LevelScriptBuilder::new().area(1).area(2).build());

    let mut rt = RecordingRuntime::new().reenter(CALLBACK, "get_texture_info", vec!["brick".into()]);
    assert_eq!(parse(&mut bridge, &mut rt, 9), 1);
    assert_eq!(rt.calls().len(), 2);
    assert_eq!(rt.host_replies().len(), 2);
    for reply in rt.host_replies() {
        assert_eq!(reply.count, 1);
        assert_eq!(reply.results, vec![info.to_variant()]);
        assert!(reply.diagnostics.is_empty());
    }
    assert_eq!(rt.live_refs(), 0);
    assert_eq!(bridge.game_data().level_script_parse().state(), ParseState::Idle);
    Ok(())
}

#[test]
fn nested_parse_during_a_walk_is_refused() -> Result<()> {
    let mut bridge = bridge();
    bridge
        .game_data_mut()
        .levels_mut()
        .insert(9, LevelScriptBuilder::new().area(1).build());

    let nested = vec![9.into(), Variant::Function(FunctionRef(8))];
    let mut rt = RecordingRuntime::new().reenter(CALLBACK, "level_script_parse", nested);
    assert_eq!(parse(&mut bridge, &mut rt, 9), 1);

    assert_eq!(rt.host_replies().len(), 1);
    let reply = &rt.host_replies()[0];
    assert_eq!(reply.count, 0);
    assert_eq!(
        reply.diagnostics,
        vec!["level_script_parse: a level script walk is already in progress".to_string()]
    );
    assert_eq!(
        bridge.diagnostics().last(),
        Some("level_script_parse: a level script walk is already in progress")
    );
    assert_eq!(rt.calls_to(FunctionRef(8)).count(), 0);
    assert_eq!(rt.live_refs(), 0);
    assert_eq!(bridge.game_data().level_script_parse().state(), ParseState::Idle);
    Ok(())
}
