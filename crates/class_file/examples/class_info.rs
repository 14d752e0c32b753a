use std::{env, fs, process};

use jdecode_class_file::{ClassFile, Result};

fn main() {
    pretty_env_logger::init();

    let Some(path) = env::args().nth(1) else {
        eprintln!("usage: class_info <path/to/Some.class>");
        process::exit(2);
    };
    let bytes = fs::read(&path).unwrap();

    if let Err(e) = print_class(&bytes) {
        log::error!("{}: {}", path, e);
        process::exit(1);
    }
}

fn print_class(bytes: &[u8]) -> Result<()> {
    let class_file = ClassFile::parse(bytes)?;

    println!("Size:          {} bytes", class_file.size);
    println!(
        "Version:       {}.{}",
        class_file.major_version, class_file.minor_version
    );
    println!("Access flags:  {}", class_file.access_flags().names().join(" "));
    println!("This class:    {}", class_file.class_name()?);
    println!(
        "Super class:   {}",
        class_file.super_class()?.unwrap_or("-")
    );
    for interface in class_file.interfaces()? {
        println!("Interface:     {}", interface);
    }

    println!();
    for field in &class_file.fields {
        println!(
            "    {} {} {}",
            field.access_flags().names().join(" "),
            class_file.field_name(field)?,
            class_file.field_descriptor(field)?
        );
    }
    for method in &class_file.methods {
        println!(
            "    {} {}{}",
            method.access_flags().names().join(" "),
            class_file.method_name(method)?,
            class_file.method_descriptor(method)?
        );
    }

    Ok(())
}
