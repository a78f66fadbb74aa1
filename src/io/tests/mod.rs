mod tile_stream_tests;
