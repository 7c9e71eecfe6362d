pub mod level_script_parse;
