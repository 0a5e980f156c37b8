mod codec_tests;
mod service_tests;
