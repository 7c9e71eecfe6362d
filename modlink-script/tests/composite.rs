use anyhow::Result;
use modlink_core::{TextureInfo, TextureRegistry};
use modlink_script::marshal::{self, Composite};
use modlink_script::test::NullRuntime;
use modlink_script::{CallContext, FunctionTable, NativeFunction, Variant};
use pretty_assertions::assert_eq;

struct Describe;

impl NativeFunction<TextureRegistry> for Describe {
    fn call(&self, host: &mut TextureRegistry, ctx: &mut CallContext<'_>) -> usize {
        if !ctx.valid_param_count(1) {
            return 0;
        }
        let info = match TextureInfo::from_variant(ctx.arg(1), &*host) {
            Ok(info) => info,
            Err(e) => return ctx.conversion_failed(1, &e),
        };
        ctx.push(info.to_variant());
        1
    }
}

#[test]
fn texture_table_survives_a_call() -> Result<()> {
    let mut textures = TextureRegistry::new();
    let info = textures.register("hud_star", 32, 16, 16, vec![0; 1024]);
    let mut table = FunctionTable::new();
    table.bind("describe", Describe);
    let mut rt = NullRuntime;

    // opaque reference in, table out
    let r = textures.reference("hud_star").map(Variant::from);
    let mut ctx = CallContext::new("describe", vec![r.into()], &mut rt, None);
    assert_eq!(table.call("describe", &mut textures, &mut ctx), Some(1));
    let (results, _) = ctx.into_parts();
    let pushed = marshal::to_table(&results[0])?.clone();
    assert_eq!(TextureInfo::from_table(&pushed)?, info);

    // the table form is accepted back unchanged
    let mut ctx = CallContext::new("describe", vec![pushed.clone().into()], &mut rt, None);
    assert_eq!(table.call("describe", &mut textures, &mut ctx), Some(1));
    assert_eq!(ctx.results(), &[Variant::Table(pushed)]);
    Ok(())
}

#[test]
fn bad_composite_is_a_diagnostic() {
    let mut textures = TextureRegistry::new();
    let mut table = FunctionTable::new();
    table.bind("describe", Describe);
    let mut rt = NullRuntime;

    let mut ctx = CallContext::new("describe", vec![Variant::from("star")], &mut rt, None);
    assert_eq!(table.call("describe", &mut textures, &mut ctx), Some(0));
    assert!(ctx.results().is_empty());
    assert_eq!(
        ctx.diagnostics(),
        &["describe: failed to convert parameter 1: expected TextureInfo, received string".to_string()]
    );
}
